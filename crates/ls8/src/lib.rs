use std::path::Path;

use anyhow::Result;
use ls8_core::{loader, Cpu};

/// Load the program at `path` and run it to completion.
pub fn run(path: &Path) -> Result<()> {
    let program = loader::read_program(path)?;
    log::info!("loaded {} bytes from '{}'", program.len(), path.display());

    let mut cpu = Cpu::new();
    cpu.load(&program)?;
    cpu.run()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ls8_core::{loader, Cpu};

    /// Read a bundled program from the workspace `assets/programs/`
    /// directory, supporting both workspace-root and crate-relative
    /// working directories.
    fn load_bundled_program(filename: &str) -> Vec<u8> {
        let candidates = [
            PathBuf::from("assets/programs").join(filename),
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("../../assets/programs")
                .join(filename),
        ];

        for path in &candidates {
            if let Ok(source) = std::fs::read_to_string(path) {
                return loader::parse_program(&source);
            }
        }

        panic!("program {:?} not found (tried {:?})", filename, candidates);
    }

    fn run_bundled(filename: &str) -> Cpu {
        let mut cpu = Cpu::new();
        cpu.load(&load_bundled_program(filename)).unwrap();
        cpu.run().unwrap();
        cpu
    }

    #[test]
    fn print8_prints_8() {
        assert_eq!(run_bundled("print8.ls8").output(), &[8]);
    }

    #[test]
    fn mult_prints_72() {
        assert_eq!(run_bundled("mult.ls8").output(), &[72]);
    }

    #[test]
    fn stack_program_prints_pushed_values() {
        assert_eq!(run_bundled("stack.ls8").output(), &[2, 4, 1]);
    }

    #[test]
    fn call_program_returns_from_subroutines() {
        assert_eq!(run_bundled("call.ls8").output(), &[20, 30, 36, 37]);
    }
}
