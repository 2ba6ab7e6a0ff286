//! Stake address commands (`cardano-cli stake-address`).

use std::path::{Path, PathBuf};

use crate::{
    cluster::ClusterLib,
    error::{Error, Result},
    files,
    records::{
        AddressRecord, DrepCredential, KeyPair, PoolKey, StakeCredential, TxFiles, TxOut,
        TxRawOutput, VkeySource,
    },
    transaction::TxParams,
};

/// Stake address commands.
#[derive(Clone, Copy, Debug)]
pub struct StakeAddressGroup<'a> {
    pub(crate) cluster: &'a ClusterLib,
}

impl StakeAddressGroup<'_> {
    fn conway_check(&self) -> Result<()> {
        if self.cluster.conway_genesis().is_none() {
            return Err(Error::Config(
                "conway governance can be used only with command era >= conway".to_string(),
            ));
        }
        Ok(())
    }

    fn deposit_args(deposit_amt: Option<i64>) -> Vec<String> {
        match deposit_amt {
            Some(deposit_amt) => vec![
                "--key-reg-deposit-amt".to_string(),
                deposit_amt.to_string(),
            ],
            None => Vec::new(),
        }
    }

    /// Generate a stake address.
    pub async fn gen_stake_addr(
        &self,
        addr_name: &str,
        stake: &StakeCredential,
        destination_dir: &Path,
    ) -> Result<String> {
        let out_file = destination_dir.join(format!("{addr_name}_stake.addr"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = vec!["stake-address".to_string(), "build".to_string()];
        args.extend(stake.to_args());
        args.extend(self.cluster.magic_args().to_vec());
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&out_file])?;
        files::read_address_from_file(&out_file)
    }

    /// Generate a stake address key pair.
    pub async fn gen_stake_key_pair(
        &self,
        key_name: &str,
        destination_dir: &Path,
    ) -> Result<KeyPair> {
        let vkey = destination_dir.join(format!("{key_name}_stake.vkey"));
        let skey = destination_dir.join(format!("{key_name}_stake.skey"));
        self.cluster.check_dest_files(&[&vkey, &skey])?;

        self.cluster
            .cli(vec![
                "stake-address".to_string(),
                "key-gen".to_string(),
                "--verification-key-file".to_string(),
                files::path_str(&vkey),
                "--signing-key-file".to_string(),
                files::path_str(&skey),
            ])
            .await?;

        files::check_outfiles(&[&vkey, &skey])?;
        Ok(KeyPair::new(vkey, skey))
    }

    /// Generate a stake address registration certificate.
    ///
    /// The deposit amount is required in Conway and later eras.
    pub async fn gen_stake_addr_registration_cert(
        &self,
        addr_name: &str,
        deposit_amt: Option<i64>,
        stake: &StakeCredential,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{addr_name}_stake_reg.cert"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = vec![
            "stake-address".to_string(),
            "registration-certificate".to_string(),
        ];
        args.extend(Self::deposit_args(deposit_amt));
        args.extend(stake.to_args());
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Generate a stake address deregistration certificate.
    pub async fn gen_stake_addr_deregistration_cert(
        &self,
        addr_name: &str,
        deposit_amt: Option<i64>,
        stake: &StakeCredential,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{addr_name}_stake_dereg.cert"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = vec![
            "stake-address".to_string(),
            "deregistration-certificate".to_string(),
        ];
        args.extend(Self::deposit_args(deposit_amt));
        args.extend(stake.to_args());
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Generate a stake delegation certificate.
    pub async fn gen_stake_addr_delegation_cert(
        &self,
        addr_name: &str,
        stake: &StakeCredential,
        pool: &PoolKey,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{addr_name}_stake_deleg.cert"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = vec![
            "stake-address".to_string(),
            "stake-delegation-certificate".to_string(),
        ];
        args.extend(stake.to_args());
        args.extend(pool.to_args());
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Generate a vote delegation certificate (Conway and later).
    pub async fn gen_vote_delegation_cert(
        &self,
        addr_name: &str,
        stake: &StakeCredential,
        drep: &DrepCredential,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        self.conway_check()?;

        let out_file = destination_dir.join(format!("{addr_name}_vote_deleg.cert"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = vec![
            "stake-address".to_string(),
            "vote-delegation-certificate".to_string(),
        ];
        args.extend(stake.to_args());
        args.extend(drep.to_args());
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Generate a combined stake and vote delegation certificate (Conway and
    /// later).
    pub async fn gen_stake_and_vote_delegation_cert(
        &self,
        addr_name: &str,
        stake: &StakeCredential,
        pool: &PoolKey,
        drep: &DrepCredential,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        self.conway_check()?;

        let out_file = destination_dir.join(format!("{addr_name}_vote_deleg.cert"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = vec![
            "stake-address".to_string(),
            "stake-and-vote-delegation-certificate".to_string(),
        ];
        args.extend(stake.to_args());
        args.extend(pool.to_args());
        args.extend(drep.to_args());
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Generate a stake address together with its key pair.
    pub async fn gen_stake_addr_and_keys(
        &self,
        name: &str,
        destination_dir: &Path,
    ) -> Result<AddressRecord> {
        let key_pair = self.gen_stake_key_pair(name, destination_dir).await?;
        let address = self
            .gen_stake_addr(
                name,
                &StakeCredential::VkeyFile(key_pair.vkey_file.clone()),
                destination_dir,
            )
            .await?;

        Ok(AddressRecord {
            address,
            vkey_file: key_pair.vkey_file,
            skey_file: key_pair.skey_file,
        })
    }

    /// Return the hash of a stake verification key.
    pub async fn get_stake_vkey_hash(&self, stake_vkey: &VkeySource) -> Result<String> {
        let mut args = vec!["stake-address".to_string(), "key-hash".to_string()];
        args.extend(stake_vkey.to_args("stake"));
        let out = self.cluster.cli(args).await?;
        Ok(out.stdout_trimmed())
    }

    /// Withdraw the whole reward balance to a payment address.
    ///
    /// With `verify`, checks that the reward balance dropped to zero and the
    /// destination balance increased accordingly.
    pub async fn withdraw_reward(
        &self,
        stake_addr_record: &AddressRecord,
        dst_addr_record: &AddressRecord,
        tx_name: &str,
        verify: bool,
        destination_dir: &Path,
    ) -> Result<TxRawOutput> {
        let dst_address = &dst_addr_record.address;
        let src_init_balance = self
            .cluster
            .query()
            .get_address_lovelace(dst_address)
            .await?;

        let params = TxParams {
            tx_files: TxFiles::with_signing_keys([
                dst_addr_record.skey_file.clone(),
                stake_addr_record.skey_file.clone(),
            ]),
            withdrawals: vec![TxOut::new(stake_addr_record.address.clone(), -1)],
            ..Default::default()
        };

        let tx_raw_withdrawal_output = self
            .cluster
            .transaction()
            .send_tx(
                dst_address,
                &format!("{tx_name}_reward_withdrawal"),
                None,
                &params,
                true,
                destination_dir,
            )
            .await?;

        if !verify {
            return Ok(tx_raw_withdrawal_output);
        }

        // The reward balance must be zero now.
        let reward_balance = self
            .cluster
            .query()
            .get_stake_addr_info(&stake_addr_record.address)
            .await?
            .reward_account_balance;
        if reward_balance != 0 {
            return Err(Error::InvalidArguments(
                "not all rewards were transferred".to_string(),
            ));
        }

        // And the destination must have received the rewards minus the fee.
        let src_reward_balance = self
            .cluster
            .query()
            .get_address_lovelace(dst_address)
            .await?;
        let withdrawn = tx_raw_withdrawal_output
            .withdrawals
            .first()
            .map(|w| w.amount)
            .unwrap_or(0);
        if src_reward_balance != src_init_balance - tx_raw_withdrawal_output.fee + withdrawn {
            return Err(Error::InvalidArguments(format!(
                "incorrect balance for destination address `{dst_address}`"
            )));
        }

        Ok(tx_raw_withdrawal_output)
    }
}
