//! Generic key commands (`cardano-cli key`).

use std::path::{Path, PathBuf};

use crate::{cluster::ClusterLib, error::Result, files};

/// Generic key commands.
#[derive(Clone, Copy, Debug)]
pub struct KeyGroup<'a> {
    pub(crate) cluster: &'a ClusterLib,
}

impl KeyGroup<'_> {
    /// Generate a verification key from a signing key.
    pub async fn gen_verification_key(
        &self,
        key_name: &str,
        signing_key_file: &Path,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{key_name}.vkey"));
        self.cluster.check_dest_files(&[&out_file])?;

        self.cluster
            .cli(vec![
                "key".to_string(),
                "verification-key".to_string(),
                "--signing-key-file".to_string(),
                files::path_str(signing_key_file),
                "--verification-key-file".to_string(),
                files::path_str(&out_file),
            ])
            .await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Generate a non-extended key from an extended verification key.
    pub async fn gen_non_extended_verification_key(
        &self,
        key_name: &str,
        extended_verification_key_file: &Path,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{key_name}.vkey"));
        self.cluster.check_dest_files(&[&out_file])?;

        self.cluster
            .cli(vec![
                "key".to_string(),
                "non-extended-key".to_string(),
                "--extended-verification-key-file".to_string(),
                files::path_str(extended_verification_key_file),
                "--verification-key-file".to_string(),
                files::path_str(&out_file),
            ])
            .await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }
}
