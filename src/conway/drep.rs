//! Conway governance DRep commands (`governance drep`).

use std::path::{Path, PathBuf};

use crate::{
    cluster::ClusterLib,
    error::{Error, Result},
    files,
    records::{DrepCredential, KeyPair, VkeySource},
};

/// Requested encoding of a DRep id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrepIdFormat {
    /// Hex-encoded id.
    Hex,
    /// Bech32-encoded id.
    Bech32,
}

impl DrepIdFormat {
    fn as_str(&self) -> &'static str {
        match self {
            DrepIdFormat::Hex => "hex",
            DrepIdFormat::Bech32 => "bech32",
        }
    }
}

/// DRep commands.
#[derive(Clone, Copy, Debug)]
pub struct GovDrepGroup<'a> {
    pub(crate) cluster: &'a ClusterLib,
}

impl GovDrepGroup<'_> {
    fn group_args(&self) -> Vec<String> {
        vec!["governance".to_string(), "drep".to_string()]
    }

    fn concrete_cred_args(drep: &DrepCredential) -> Result<Vec<String>> {
        if !drep.is_concrete() {
            return Err(Error::InvalidArguments(
                "a concrete DRep key or script hash is needed".to_string(),
            ));
        }
        Ok(drep.to_args())
    }

    /// Whether `drep id` supports the newer `--output-hex`/`--output-bech32`
    /// options; probed once and cached.
    async fn has_output_hex(&self) -> Result<bool> {
        if let Some(has) = self.cluster.drep_has_output_hex.get() {
            return Ok(*has);
        }
        let probe = self
            .cluster
            .cli_raw(vec![
                "cardano-cli".to_string(),
                "conway".to_string(),
                "governance".to_string(),
                "drep".to_string(),
                "id".to_string(),
                "--output-hex".to_string(),
            ])
            .await;
        let has = match probe {
            Ok(_) => true,
            Err(Error::Cli { stderr, .. }) => !stderr.contains("Invalid option"),
            Err(err) => return Err(err),
        };
        Ok(*self.cluster.drep_has_output_hex.get_or_init(|| has))
    }

    /// Generate DRep verification and signing keys.
    pub async fn gen_key_pair(&self, key_name: &str, destination_dir: &Path) -> Result<KeyPair> {
        let vkey = destination_dir.join(format!("{key_name}_drep.vkey"));
        let skey = destination_dir.join(format!("{key_name}_drep.skey"));
        self.cluster.check_dest_files(&[&vkey, &skey])?;

        let mut args = self.group_args();
        args.extend([
            "key-gen".to_string(),
            "--verification-key-file".to_string(),
            files::path_str(&vkey),
            "--signing-key-file".to_string(),
            files::path_str(&skey),
        ]);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&vkey, &skey])?;
        Ok(KeyPair::new(vkey, skey))
    }

    /// Return a DRep id, bech32-encoded unless another format is requested.
    pub async fn get_id(
        &self,
        drep_vkey: &VkeySource,
        out_format: Option<DrepIdFormat>,
    ) -> Result<String> {
        let mut cli_args = drep_vkey.to_args("drep");

        if let Some(out_format) = out_format {
            if self.has_output_hex().await? {
                cli_args.push(format!("--output-{}", out_format.as_str()));
            } else {
                cli_args.extend([
                    "--output-format".to_string(),
                    out_format.as_str().to_string(),
                ]);
            }
        }

        let mut args = self.group_args();
        args.push("id".to_string());
        args.extend(cli_args);
        let out = self.cluster.cli(args).await?;
        Ok(out.stdout_trimmed())
    }

    /// Generate a DRep registration certificate.
    #[allow(clippy::too_many_arguments)]
    pub async fn gen_registration_cert(
        &self,
        cert_name: &str,
        deposit_amt: i64,
        drep: &DrepCredential,
        drep_metadata_url: Option<&str>,
        drep_metadata_hash: Option<&str>,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{cert_name}_drep_reg.cert"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = self.group_args();
        args.push("registration-certificate".to_string());
        args.extend(Self::concrete_cred_args(drep)?);
        args.extend([
            "--key-reg-deposit-amt".to_string(),
            deposit_amt.to_string(),
        ]);
        if let Some(url) = drep_metadata_url {
            args.extend([
                "--drep-metadata-url".to_string(),
                url.to_string(),
                "--drep-metadata-hash".to_string(),
                drep_metadata_hash.unwrap_or_default().to_string(),
            ]);
        }
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Generate a DRep update certificate.
    pub async fn gen_update_cert(
        &self,
        cert_name: &str,
        deposit_amt: i64,
        drep: &DrepCredential,
        drep_metadata_url: Option<&str>,
        drep_metadata_hash: Option<&str>,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{cert_name}_drep_update.cert"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = self.group_args();
        args.push("update-certificate".to_string());
        args.extend(Self::concrete_cred_args(drep)?);
        args.extend([
            "--key-reg-deposit-amt".to_string(),
            deposit_amt.to_string(),
        ]);
        if let Some(url) = drep_metadata_url {
            args.extend([
                "--drep-metadata-url".to_string(),
                url.to_string(),
                "--drep-metadata-hash".to_string(),
                drep_metadata_hash.unwrap_or_default().to_string(),
            ]);
        }
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Generate a DRep retirement certificate.
    pub async fn gen_retirement_cert(
        &self,
        cert_name: &str,
        deposit_amt: i64,
        drep: &DrepCredential,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{cert_name}_drep_retirement.cert"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = self.group_args();
        args.push("retirement-certificate".to_string());
        args.extend(Self::concrete_cred_args(drep)?);
        args.extend([
            "--deposit-amt".to_string(),
            deposit_amt.to_string(),
            "--out-file".to_string(),
            files::path_str(&out_file),
        ]);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Get the hash of DRep metadata.
    pub async fn get_metadata_hash(&self, drep_metadata_file: &Path) -> Result<String> {
        if !drep_metadata_file.exists() {
            return Err(Error::MissingFile(drep_metadata_file.to_path_buf()));
        }
        let mut args = self.group_args();
        args.extend([
            "metadata-hash".to_string(),
            "--drep-metadata-file".to_string(),
            files::path_str(drep_metadata_file),
        ]);
        let out = self.cluster.cli(args).await?;
        Ok(out.stdout_trimmed())
    }
}
