//! Small file and argument-list helpers shared by the command groups.

use std::path::Path;

use rand::Rng;

use crate::error::{Error, Result};

/// Read an address stored in a file, stripping surrounding whitespace.
pub fn read_address_from_file(addr_file: impl AsRef<Path>) -> Result<String> {
    let contents = std::fs::read_to_string(addr_file.as_ref())?;
    Ok(contents.trim().to_string())
}

/// A random ASCII lowercase string used to make artifact names unique.
pub fn get_rand_str(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| rng.gen_range(b'a'..=b'z') as char)
        .collect()
}

/// Prepend `flag` to every item, e.g. `--foo 1 --foo 2 --foo 3`.
pub(crate) fn prepend_flag<I, S>(flag: &str, contents: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    contents
        .into_iter()
        .flat_map(|item| [flag.to_string(), item.as_ref().to_string()])
        .collect()
}

/// Like [`prepend_flag`], for path lists.
pub(crate) fn prepend_flag_paths<I, P>(flag: &str, contents: I) -> Vec<String>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    contents
        .into_iter()
        .flat_map(|item| {
            [
                flag.to_string(),
                item.as_ref().to_string_lossy().into_owned(),
            ]
        })
        .collect()
}

/// Check that all expected output files were created.
pub(crate) fn check_outfiles(out_files: &[&Path]) -> Result<()> {
    for out_file in out_files {
        if !out_file.exists() {
            return Err(Error::MissingFile(out_file.to_path_buf()));
        }
    }
    Ok(())
}

pub(crate) fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_flag_to_every_item() {
        assert_eq!(
            prepend_flag("--foo", ["1", "2", "3"]),
            vec!["--foo", "1", "--foo", "2", "--foo", "3"]
        );
        assert!(prepend_flag::<_, &str>("--foo", []).is_empty());
    }

    #[test]
    fn rand_str_has_requested_length() {
        assert_eq!(get_rand_str(4).len(), 4);
        assert!(get_rand_str(0).is_empty());
        assert!(get_rand_str(8).chars().all(|c| c.is_ascii_lowercase()));
    }
}
