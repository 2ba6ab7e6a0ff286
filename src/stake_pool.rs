//! Stake pool commands (`cardano-cli stake-pool`).

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    cluster::ClusterLib,
    error::Result,
    files,
    records::{
        ColdKeyPair, PoolCreationOutput, PoolData, PoolKey, PoolUser, TxFiles, TxRawOutput,
    },
    transaction::TxParams,
};

/// Stake pool commands.
#[derive(Clone, Copy, Debug)]
pub struct StakePoolGroup<'a> {
    pub(crate) cluster: &'a ClusterLib,
}

impl StakePoolGroup<'_> {
    /// Generate the hash of pool metadata.
    pub async fn gen_pool_metadata_hash(&self, pool_metadata_file: &Path) -> Result<String> {
        let out = self
            .cluster
            .cli(vec![
                "stake-pool".to_string(),
                "metadata-hash".to_string(),
                "--pool-metadata-file".to_string(),
                files::path_str(pool_metadata_file),
            ])
            .await?;
        Ok(out.stdout_trimmed())
    }

    /// Generate a stake pool registration certificate.
    pub async fn gen_pool_registration_cert(
        &self,
        pool_data: &PoolData,
        vrf_vkey_file: &Path,
        cold_vkey_file: &Path,
        owner_stake_vkey_files: &[PathBuf],
        reward_account_vkey_file: Option<&Path>,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{}_pool_reg.cert", pool_data.pool_name));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut metadata_cmd: Vec<String> = Vec::new();
        if !pool_data.pool_metadata_url.is_empty() && !pool_data.pool_metadata_hash.is_empty() {
            metadata_cmd = vec![
                "--metadata-url".to_string(),
                pool_data.pool_metadata_url.clone(),
                "--metadata-hash".to_string(),
                pool_data.pool_metadata_hash.clone(),
            ];
        }

        let mut relay_cmd: Vec<String> = Vec::new();
        if !pool_data.pool_relay_dns.is_empty() {
            relay_cmd.extend([
                "--single-host-pool-relay".to_string(),
                pool_data.pool_relay_dns.clone(),
            ]);
        }
        if !pool_data.pool_relay_ipv4.is_empty() {
            relay_cmd.extend([
                "--pool-relay-ipv4".to_string(),
                pool_data.pool_relay_ipv4.clone(),
            ]);
        }
        if pool_data.pool_relay_port != 0 {
            relay_cmd.extend([
                "--pool-relay-port".to_string(),
                pool_data.pool_relay_port.to_string(),
            ]);
        }

        let reward_account_vkey = reward_account_vkey_file
            .map(Path::to_path_buf)
            .or_else(|| owner_stake_vkey_files.first().cloned())
            .unwrap_or_default();

        let mut args = vec![
            "stake-pool".to_string(),
            "registration-certificate".to_string(),
            "--pool-pledge".to_string(),
            pool_data.pool_pledge.to_string(),
            "--pool-cost".to_string(),
            pool_data.pool_cost.to_string(),
            "--pool-margin".to_string(),
            pool_data.pool_margin.to_string(),
            "--vrf-verification-key-file".to_string(),
            files::path_str(vrf_vkey_file),
            "--cold-verification-key-file".to_string(),
            files::path_str(cold_vkey_file),
            "--pool-reward-account-verification-key-file".to_string(),
            files::path_str(&reward_account_vkey),
        ];
        args.extend(files::prepend_flag_paths(
            "--pool-owner-stake-verification-key-file",
            owner_stake_vkey_files,
        ));
        args.extend(self.cluster.magic_args().to_vec());
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        args.extend(metadata_cmd);
        args.extend(relay_cmd);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Generate a stake pool deregistration certificate.
    pub async fn gen_pool_deregistration_cert(
        &self,
        pool_name: &str,
        cold_vkey_file: &Path,
        epoch: i64,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{pool_name}_pool_dereg.cert"));
        self.cluster.check_dest_files(&[&out_file])?;

        self.cluster
            .cli(vec![
                "stake-pool".to_string(),
                "deregistration-certificate".to_string(),
                "--cold-verification-key-file".to_string(),
                files::path_str(cold_vkey_file),
                "--epoch".to_string(),
                epoch.to_string(),
                "--out-file".to_string(),
                files::path_str(&out_file),
            ])
            .await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Return the pool id derived from the pool's offline key.
    pub async fn get_stake_pool_id(&self, pool_key: &PoolKey) -> Result<String> {
        let mut args = vec!["stake-pool".to_string(), "id".to_string()];
        args.extend(pool_key.to_args());
        let out = self.cluster.cli(args).await?;
        Ok(out.stdout_trimmed())
    }

    /// Create all pool keys and register the stake pool.
    pub async fn create_stake_pool(
        &self,
        pool_data: &PoolData,
        pool_owners: &[PoolUser],
        tx_name: &str,
        destination_dir: &Path,
    ) -> Result<PoolCreationOutput> {
        let node_kes = self
            .cluster
            .node()
            .gen_kes_key_pair(&pool_data.pool_name, destination_dir)
            .await?;
        debug!(
            "KES keys created - {}; {}",
            node_kes.vkey_file.display(),
            node_kes.skey_file.display()
        );

        let node_vrf = self
            .cluster
            .node()
            .gen_vrf_key_pair(&pool_data.pool_name, destination_dir)
            .await?;
        debug!(
            "VRF keys created - {}; {}",
            node_vrf.vkey_file.display(),
            node_vrf.skey_file.display()
        );

        let node_cold = self
            .cluster
            .node()
            .gen_cold_key_pair_and_counter(&pool_data.pool_name, destination_dir)
            .await?;
        debug!(
            "cold keys and counter created - {}; {}; {}",
            node_cold.vkey_file.display(),
            node_cold.skey_file.display(),
            node_cold.counter_file.display()
        );

        let (pool_reg_cert_file, tx_raw_output) = self
            .register_stake_pool(
                pool_data,
                pool_owners,
                &node_vrf.vkey_file,
                &node_cold,
                tx_name,
                None,
                None,
                destination_dir,
            )
            .await?;

        let stake_pool_id = self
            .get_stake_pool_id(&PoolKey::ColdVkeyFile(node_cold.vkey_file.clone()))
            .await?;

        Ok(PoolCreationOutput {
            stake_pool_id,
            vrf_key_pair: node_vrf,
            cold_key_pair: node_cold,
            pool_reg_cert_file,
            pool_data: pool_data.clone(),
            pool_owners: pool_owners.to_vec(),
            tx_raw_output,
            kes_key_pair: Some(node_kes),
        })
    }

    /// Register a stake pool: generate the registration certificate and
    /// submit it through a transaction.
    #[allow(clippy::too_many_arguments)]
    pub async fn register_stake_pool(
        &self,
        pool_data: &PoolData,
        pool_owners: &[PoolUser],
        vrf_vkey_file: &Path,
        cold_key_pair: &ColdKeyPair,
        tx_name: &str,
        reward_account_vkey_file: Option<&Path>,
        deposit: Option<i64>,
        destination_dir: &Path,
    ) -> Result<(PathBuf, TxRawOutput)> {
        let first_owner = pool_owners.first().ok_or_else(|| {
            crate::error::Error::InvalidArguments("at least one pool owner is needed".to_string())
        })?;
        let tx_name = format!("{tx_name}_reg_pool");
        let owner_stake_vkeys: Vec<PathBuf> = pool_owners
            .iter()
            .map(|p| p.stake.vkey_file.clone())
            .collect();
        let pool_reg_cert_file = self
            .gen_pool_registration_cert(
                pool_data,
                vrf_vkey_file,
                &cold_key_pair.vkey_file,
                &owner_stake_vkeys,
                reward_account_vkey_file,
                destination_dir,
            )
            .await?;

        // Submit the registration certificate through a tx.
        let mut signing_key_files: Vec<PathBuf> = pool_owners
            .iter()
            .map(|p| p.payment.skey_file.clone())
            .collect();
        signing_key_files.extend(pool_owners.iter().map(|p| p.stake.skey_file.clone()));
        signing_key_files.push(cold_key_pair.skey_file.clone());

        let params = TxParams {
            tx_files: TxFiles {
                certificate_files: vec![pool_reg_cert_file.clone()],
                signing_key_files,
                ..Default::default()
            },
            deposit,
            ..Default::default()
        };

        let tx_raw_output = self
            .cluster
            .transaction()
            .send_tx(
                &first_owner.payment.address,
                &tx_name,
                None,
                &params,
                true,
                destination_dir,
            )
            .await?;

        Ok((pool_reg_cert_file, tx_raw_output))
    }

    /// Deregister a stake pool: generate the deregistration certificate and
    /// submit it through a transaction.
    pub async fn deregister_stake_pool(
        &self,
        pool_owners: &[PoolUser],
        cold_key_pair: &ColdKeyPair,
        epoch: i64,
        pool_name: &str,
        tx_name: &str,
        destination_dir: &Path,
    ) -> Result<(PathBuf, TxRawOutput)> {
        let first_owner = pool_owners.first().ok_or_else(|| {
            crate::error::Error::InvalidArguments("at least one pool owner is needed".to_string())
        })?;
        let tx_name = format!("{tx_name}_dereg_pool");
        debug!(
            "deregistering stake pool starting with epoch {epoch}; current epoch is {}",
            self.cluster.query().get_epoch().await?
        );
        let pool_dereg_cert_file = self
            .gen_pool_deregistration_cert(
                pool_name,
                &cold_key_pair.vkey_file,
                epoch,
                destination_dir,
            )
            .await?;

        let mut signing_key_files: Vec<PathBuf> = pool_owners
            .iter()
            .map(|p| p.payment.skey_file.clone())
            .collect();
        signing_key_files.extend(pool_owners.iter().map(|p| p.stake.skey_file.clone()));
        signing_key_files.push(cold_key_pair.skey_file.clone());

        let params = TxParams {
            tx_files: TxFiles {
                certificate_files: vec![pool_dereg_cert_file.clone()],
                signing_key_files,
                ..Default::default()
            },
            ..Default::default()
        };

        let tx_raw_output = self
            .cluster
            .transaction()
            .send_tx(
                &first_owner.payment.address,
                &tx_name,
                None,
                &params,
                true,
                destination_dir,
            )
            .await?;

        Ok((pool_dereg_cert_file, tx_raw_output))
    }
}
