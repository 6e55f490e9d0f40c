use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::error::TimingWriterError;
use super::trial::Block;

const TEMP_SUFFIX: &str = ".partial";

/// Render blocks in the 3-column timing format, one newline-terminated line per block
pub fn format_blocks(blocks: &[Block]) -> String {
    let mut contents = String::new();
    for block in blocks {
        contents.push_str(&block.to_string());
        contents.push('\n');
    }
    contents
}

/// Write a timing file.
///
/// The contents go to a sibling temporary file first, which is renamed over the target once
/// fully flushed. A failure never leaves a partial timing file behind.
pub fn write_timing_file(path: &Path, blocks: &[Block]) -> Result<(), TimingWriterError> {
    let temp_path = temp_path_for(path)?;
    match write_and_sync(&temp_path, &format_blocks(blocks)) {
        Ok(()) => {
            std::fs::rename(&temp_path, path)?;
            Ok(())
        }
        Err(e) => {
            // The original write error is the interesting one
            let _ = std::fs::remove_file(&temp_path);
            Err(e)
        }
    }
}

fn write_and_sync(path: &Path, contents: &str) -> Result<(), TimingWriterError> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn temp_path_for(path: &Path) -> Result<PathBuf, TimingWriterError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| TimingWriterError::BadFilePath(path.to_path_buf()))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(TEMP_SUFFIX);
    Ok(path.with_file_name(temp_name))
}

//Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn is_timing_line(line: &str) -> bool {
        let fields: Vec<&str> = line.split('\t').collect();
        let is_fixed6 = |field: &str| {
            let digits = field.strip_prefix('-').unwrap_or(field);
            match digits.split_once('.') {
                Some((whole, frac)) => {
                    !whole.is_empty()
                        && whole.chars().all(|c| c.is_ascii_digit())
                        && frac.len() == 6
                        && frac.chars().all(|c| c.is_ascii_digit())
                }
                None => false,
            }
        };
        fields.len() == 3 && is_fixed6(fields[0]) && is_fixed6(fields[1]) && fields[2] == "1"
    }

    #[test]
    fn test_format_blocks() {
        let blocks = vec![Block::spanning(0.0, 2.0), Block::spanning(5.125, 9.5)];
        assert_eq!(
            format_blocks(&blocks),
            "0.000000\t2.000000\t1\n5.125000\t4.375000\t1\n"
        );
        assert_eq!(format_blocks(&[]), "");
    }

    #[test]
    fn test_lines_are_fixed_point() {
        let blocks = vec![
            Block::spanning(0.1 + 0.2, 1e-9),
            Block::spanning(12345678.123456789, 12345679.0),
            Block::spanning(2.0, 1.5),
        ];
        for line in format_blocks(&blocks).lines() {
            assert!(is_timing_line(line), "bad line: {line}");
        }
    }

    #[test]
    fn test_write_timing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Recog_Run1_Obj.txt");
        write_timing_file(&path, &[Block::spanning(1.0, 3.5)]).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "1.000000\t2.500000\t1\n");
        assert!(!dir.path().join("Recog_Run1_Obj.txt.partial").exists());
    }

    #[test]
    fn test_failed_write_leaves_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("Recog_Run1_Obj.txt");
        assert!(write_timing_file(&path, &[Block::spanning(1.0, 3.5)]).is_err());
        assert!(!path.exists());
        assert!(!path.with_file_name("Recog_Run1_Obj.txt.partial").exists());
    }
}
