//! Payment address commands (`cardano-cli address`).

use std::path::Path;

use crate::{
    cluster::ClusterLib,
    error::Result,
    files,
    records::{AddressInfo, AddressRecord, KeyPair, PaymentCredential, StakeCredential},
};

/// Payment address commands.
#[derive(Clone, Copy, Debug)]
pub struct AddressGroup<'a> {
    pub(crate) cluster: &'a ClusterLib,
}

impl AddressGroup<'_> {
    /// Generate a payment address, optionally delegating to a stake
    /// credential.
    ///
    /// Returns the generated address; the address file is stored in
    /// `destination_dir`.
    pub async fn gen_payment_addr(
        &self,
        addr_name: &str,
        payment: &PaymentCredential,
        stake: Option<&StakeCredential>,
        destination_dir: &Path,
    ) -> Result<String> {
        let out_file = destination_dir.join(format!("{addr_name}.addr"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = vec!["address".to_string(), "build".to_string()];
        args.extend(self.cluster.magic_args().to_vec());
        args.extend(payment.to_args());
        if let Some(stake) = stake {
            args.extend(stake.to_args());
        }
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&out_file])?;
        files::read_address_from_file(&out_file)
    }

    /// Generate a payment key pair.
    pub async fn gen_payment_key_pair(
        &self,
        key_name: &str,
        extended: bool,
        destination_dir: &Path,
    ) -> Result<KeyPair> {
        let vkey = destination_dir.join(format!("{key_name}.vkey"));
        let skey = destination_dir.join(format!("{key_name}.skey"));
        self.cluster.check_dest_files(&[&vkey, &skey])?;

        let mut args = vec![
            "address".to_string(),
            "key-gen".to_string(),
            "--verification-key-file".to_string(),
            files::path_str(&vkey),
        ];
        if extended {
            args.push("--extended-key".to_string());
        }
        args.extend(["--signing-key-file".to_string(), files::path_str(&skey)]);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&vkey, &skey])?;
        Ok(KeyPair::new(vkey, skey))
    }

    /// Return the hash of a payment verification key.
    pub async fn get_payment_vkey_hash(&self, payment: &PaymentCredential) -> Result<String> {
        let mut args = vec!["address".to_string(), "key-hash".to_string()];
        args.extend(payment.to_args());
        let out = self.cluster.cli(args).await?;
        Ok(out.stdout_trimmed())
    }

    /// Get information about an address.
    pub async fn get_address_info(&self, address: &str) -> Result<AddressInfo> {
        let out = self
            .cluster
            .cli(vec![
                "address".to_string(),
                "info".to_string(),
                "--address".to_string(),
                address.to_string(),
            ])
            .await?;
        Ok(serde_json::from_str(&out.stdout_trimmed())?)
    }

    /// Generate a payment address together with its key pair.
    pub async fn gen_payment_addr_and_keys(
        &self,
        name: &str,
        stake: Option<&StakeCredential>,
        destination_dir: &Path,
    ) -> Result<AddressRecord> {
        let key_pair = self
            .gen_payment_key_pair(name, false, destination_dir)
            .await?;
        let address = self
            .gen_payment_addr(
                name,
                &PaymentCredential::VkeyFile(key_pair.vkey_file.clone()),
                stake,
                destination_dir,
            )
            .await?;

        Ok(AddressRecord {
            address,
            vkey_file: key_pair.vkey_file,
            skey_file: key_pair.skey_file,
        })
    }
}
