//! Conway governance committee commands (`governance committee`).

use std::path::{Path, PathBuf};

use crate::{
    cluster::ClusterLib,
    error::Result,
    files,
    records::{KeyPair, VkeySource},
};

use super::records::{CcColdCredential, CcHotCredential};

/// Constitutional Committee commands.
#[derive(Clone, Copy, Debug)]
pub struct GovCommitteeGroup<'a> {
    pub(crate) cluster: &'a ClusterLib,
}

impl GovCommitteeGroup<'_> {
    fn group_args(&self) -> Vec<String> {
        vec!["governance".to_string(), "committee".to_string()]
    }

    /// Create a cold key resignation certificate for a committee member.
    pub async fn gen_cold_key_resignation_cert(
        &self,
        key_name: &str,
        cold: &CcColdCredential,
        resignation_metadata_url: &str,
        resignation_metadata_hash: &str,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let cert_file = destination_dir.join(format!("{key_name}_committee_cold_resignation.cert"));
        self.cluster.check_dest_files(&[&cert_file])?;

        let mut args = self.group_args();
        args.push("create-cold-key-resignation-certificate".to_string());
        args.extend(cold.to_args());
        args.extend([
            "--resignation-metadata-url".to_string(),
            resignation_metadata_url.to_string(),
            "--resignation-metadata-hash".to_string(),
            resignation_metadata_hash.to_string(),
            "--out-file".to_string(),
            files::path_str(&cert_file),
        ]);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&cert_file])?;
        Ok(cert_file)
    }

    /// Create a hot key authorization certificate for a committee member.
    pub async fn gen_hot_key_auth_cert(
        &self,
        key_name: &str,
        cold: &CcColdCredential,
        hot: &CcHotCredential,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let cert_file = destination_dir.join(format!("{key_name}_committee_hot_auth.cert"));
        self.cluster.check_dest_files(&[&cert_file])?;

        let mut args = self.group_args();
        args.push("create-hot-key-authorization-certificate".to_string());
        args.extend(cold.to_args());
        args.extend(hot.to_auth_args());
        args.extend([
            "--out-file".to_string(),
            files::path_str(&cert_file),
        ]);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&cert_file])?;
        Ok(cert_file)
    }

    /// Create a cold key pair for a committee member.
    pub async fn gen_cold_key_pair(
        &self,
        key_name: &str,
        destination_dir: &Path,
    ) -> Result<KeyPair> {
        let vkey = destination_dir.join(format!("{key_name}_committee_cold.vkey"));
        let skey = destination_dir.join(format!("{key_name}_committee_cold.skey"));
        self.cluster.check_dest_files(&[&vkey, &skey])?;

        let mut args = self.group_args();
        args.extend([
            "key-gen-cold".to_string(),
            "--cold-verification-key-file".to_string(),
            files::path_str(&vkey),
            "--cold-signing-key-file".to_string(),
            files::path_str(&skey),
        ]);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&vkey, &skey])?;
        Ok(KeyPair::new(vkey, skey))
    }

    /// Create a hot key pair for a committee member.
    pub async fn gen_hot_key_pair(
        &self,
        key_name: &str,
        destination_dir: &Path,
    ) -> Result<KeyPair> {
        let vkey = destination_dir.join(format!("{key_name}_committee_hot.vkey"));
        let skey = destination_dir.join(format!("{key_name}_committee_hot.skey"));
        self.cluster.check_dest_files(&[&vkey, &skey])?;

        let mut args = self.group_args();
        args.extend([
            "key-gen-hot".to_string(),
            "--verification-key-file".to_string(),
            files::path_str(&vkey),
            "--signing-key-file".to_string(),
            files::path_str(&skey),
        ]);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&vkey, &skey])?;
        Ok(KeyPair::new(vkey, skey))
    }

    /// Get the identifier (hash) of a committee key.
    pub async fn get_key_hash(&self, vkey: &VkeySource) -> Result<String> {
        let key_args = match vkey {
            VkeySource::Key(key) => vec!["--verification-key".to_string(), key.clone()],
            VkeySource::File(file) => vec![
                "--verification-key-file".to_string(),
                files::path_str(file),
            ],
        };

        let mut args = self.group_args();
        args.push("key-hash".to_string());
        args.extend(key_args);
        let out = self.cluster.cli(args).await?;
        Ok(out.stdout_trimmed())
    }
}
