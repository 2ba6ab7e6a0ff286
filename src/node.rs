//! Node operational key and certificate commands (`cardano-cli node`).

use std::path::{Path, PathBuf};

use crate::{
    cluster::ClusterLib,
    error::Result,
    files,
    records::{ColdKeyPair, KeyPair},
};

/// Node operation commands.
#[derive(Clone, Copy, Debug)]
pub struct NodeGroup<'a> {
    pub(crate) cluster: &'a ClusterLib,
}

impl NodeGroup<'_> {
    /// Generate a KES operational key pair for a node.
    pub async fn gen_kes_key_pair(
        &self,
        node_name: &str,
        destination_dir: &Path,
    ) -> Result<KeyPair> {
        let vkey = destination_dir.join(format!("{node_name}_kes.vkey"));
        let skey = destination_dir.join(format!("{node_name}_kes.skey"));
        self.cluster.check_dest_files(&[&vkey, &skey])?;

        self.cluster
            .cli(vec![
                "node".to_string(),
                "key-gen-KES".to_string(),
                "--verification-key-file".to_string(),
                files::path_str(&vkey),
                "--signing-key-file".to_string(),
                files::path_str(&skey),
            ])
            .await?;

        files::check_outfiles(&[&vkey, &skey])?;
        Ok(KeyPair::new(vkey, skey))
    }

    /// Generate a VRF operational key pair for a node.
    pub async fn gen_vrf_key_pair(
        &self,
        node_name: &str,
        destination_dir: &Path,
    ) -> Result<KeyPair> {
        let vkey = destination_dir.join(format!("{node_name}_vrf.vkey"));
        let skey = destination_dir.join(format!("{node_name}_vrf.skey"));
        self.cluster.check_dest_files(&[&vkey, &skey])?;

        self.cluster
            .cli(vec![
                "node".to_string(),
                "key-gen-VRF".to_string(),
                "--verification-key-file".to_string(),
                files::path_str(&vkey),
                "--signing-key-file".to_string(),
                files::path_str(&skey),
            ])
            .await?;

        files::check_outfiles(&[&vkey, &skey])?;
        Ok(KeyPair::new(vkey, skey))
    }

    /// Generate an operator's offline key pair and a certificate issue
    /// counter.
    pub async fn gen_cold_key_pair_and_counter(
        &self,
        node_name: &str,
        destination_dir: &Path,
    ) -> Result<ColdKeyPair> {
        let vkey = destination_dir.join(format!("{node_name}_cold.vkey"));
        let skey = destination_dir.join(format!("{node_name}_cold.skey"));
        let counter = destination_dir.join(format!("{node_name}_cold.counter"));
        self.cluster.check_dest_files(&[&vkey, &skey, &counter])?;

        self.cluster
            .cli(vec![
                "node".to_string(),
                "key-gen".to_string(),
                "--cold-verification-key-file".to_string(),
                files::path_str(&vkey),
                "--cold-signing-key-file".to_string(),
                files::path_str(&skey),
                "--operational-certificate-issue-counter-file".to_string(),
                files::path_str(&counter),
            ])
            .await?;

        files::check_outfiles(&[&vkey, &skey, &counter])?;
        Ok(ColdKeyPair {
            vkey_file: vkey,
            skey_file: skey,
            counter_file: counter,
        })
    }

    /// Generate a node operational certificate.
    ///
    /// The certificate is used when starting the node, it is not submitted
    /// through a transaction. The current KES period is used when none is
    /// given.
    pub async fn gen_node_operational_cert(
        &self,
        node_name: &str,
        kes_vkey_file: &Path,
        cold_skey_file: &Path,
        cold_counter_file: &Path,
        kes_period: Option<i64>,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{node_name}.opcert"));
        self.cluster.check_dest_files(&[&out_file])?;

        let kes_period = match kes_period {
            Some(kes_period) => kes_period,
            None => self.cluster.query().get_kes_period().await?,
        };

        self.cluster
            .cli(vec![
                "node".to_string(),
                "issue-op-cert".to_string(),
                "--kes-verification-key-file".to_string(),
                files::path_str(kes_vkey_file),
                "--cold-signing-key-file".to_string(),
                files::path_str(cold_skey_file),
                "--operational-certificate-issue-counter".to_string(),
                files::path_str(cold_counter_file),
                "--kes-period".to_string(),
                kes_period.to_string(),
                "--out-file".to_string(),
                files::path_str(&out_file),
            ])
            .await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }
}
