//! Supported submission languages
//!
//! Each language maps to a source file name, an optional compile command and
//! a run command executed inside the sandbox container.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Supported submission language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cpp,
    Rust,
    Go,
    Python,
}

impl Language {
    /// All supported languages
    pub const ALL: &'static [Language] =
        &[Self::C, Self::Cpp, Self::Rust, Self::Go, Self::Python];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Python => "python",
        }
    }

    /// Name of the source file written into the sandbox workspace
    pub fn source_file(&self) -> &'static str {
        match self {
            Self::C => "main.c",
            Self::Cpp => "main.cpp",
            Self::Rust => "main.rs",
            Self::Go => "main.go",
            Self::Python => "main.py",
        }
    }

    /// Compile command, if the language requires a compile step
    pub fn compile_command(&self) -> Option<&'static str> {
        match self {
            Self::C => Some("gcc -O2 -o main main.c"),
            Self::Cpp => Some("g++ -O2 -std=c++17 -o main main.cpp"),
            Self::Rust => Some("rustc -O -o main main.rs"),
            Self::Go => Some("go build -o main main.go"),
            Self::Python => None,
        }
    }

    /// Command that runs the submitted program
    pub fn run_command(&self) -> &'static str {
        match self {
            Self::Python => "python3 main.py",
            _ => "./main",
        }
    }

    /// Container image providing the language toolchain
    pub fn container_image(&self) -> &'static str {
        match self {
            Self::C => "codearena/c:latest",
            Self::Cpp => "codearena/cpp:latest",
            Self::Rust => "codearena/rust:latest",
            Self::Go => "codearena/go:latest",
            Self::Python => "codearena/python:latest",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" => Ok(Self::C),
            "cpp" | "c++" => Ok(Self::Cpp),
            "rust" => Ok(Self::Rust),
            "go" => Ok(Self::Go),
            "python" | "python3" => Ok(Self::Python),
            other => Err(AppError::Validation(format!(
                "Unsupported language: {}. Supported languages: {:?}",
                other,
                Self::ALL.iter().map(|l| l.as_str()).collect::<Vec<_>>()
            ))),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
