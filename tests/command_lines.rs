//! End-to-end tests driving the command groups through a fake runner that
//! records argument vectors and replays canned outputs.

use std::{
    collections::VecDeque,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use cardano_clusterlib::{
    conway::AnchorContent,
    records::{DrepCredential, PaymentCredential, StakeCredential, TxSource},
    transaction::TxParams,
    ClusterLib, CliRunner, CommandEra, Error, RunOutput, TxFiles, TxOut, UtxoData, UtxoSource,
};
use tempfile::TempDir;

/// Records every executed argument vector, creates the files named after
/// `*-file` options and replays queued stdout responses.
#[derive(Clone, Default)]
struct FakeRunner {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    stdouts: Arc<Mutex<VecDeque<String>>>,
}

impl FakeRunner {
    fn new(stdouts: &[&str]) -> Self {
        FakeRunner {
            calls: Arc::default(),
            stdouts: Arc::new(Mutex::new(
                stdouts.iter().map(ToString::to_string).collect(),
            )),
        }
    }

    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CliRunner for FakeRunner {
    async fn run(
        &self,
        args: &[String],
        _timeout: Option<Duration>,
    ) -> cardano_clusterlib::Result<RunOutput> {
        self.calls.lock().unwrap().push(args.to_vec());

        // Pretend the command produced its out-files.
        let mut prev = "";
        for arg in args {
            if prev.ends_with("-file") {
                let path = Path::new(arg);
                if !path.exists() {
                    let contents = if arg.ends_with(".addr") {
                        "addr_test1vzfake"
                    } else {
                        "fake"
                    };
                    std::fs::write(path, contents).unwrap();
                }
            }
            prev = arg;
        }

        let stdout = self.stdouts.lock().unwrap().pop_front().unwrap_or_default();
        Ok(RunOutput {
            success: true,
            stdout: stdout.into_bytes(),
            stderr: Vec::new(),
        })
    }
}

/// Always fails; with a transient stderr for the first `transient_failures`
/// calls, with a permanent one afterwards.
struct FailingRunner {
    calls: Arc<Mutex<u32>>,
    transient_failures: u32,
    succeed_after: bool,
}

#[async_trait]
impl CliRunner for FailingRunner {
    async fn run(
        &self,
        _args: &[String],
        _timeout: Option<Duration>,
    ) -> cardano_clusterlib::Result<RunOutput> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        if *calls <= self.transient_failures {
            return Ok(RunOutput {
                success: false,
                stdout: Vec::new(),
                stderr: b"cardano-cli: resource vanished (Connection refused)".to_vec(),
            });
        }
        if self.succeed_after {
            return Ok(RunOutput {
                success: true,
                stdout: br#"{"block": 5, "epoch": 0, "era": "Conway", "hash": "aa",
                             "slot": 50, "slotsToEpochEnd": 950}"#
                    .to_vec(),
                stderr: Vec::new(),
            });
        }
        Ok(RunOutput {
            success: false,
            stdout: Vec::new(),
            stderr: b"Command failed: transaction submit  Error: fatal".to_vec(),
        })
    }
}

fn state_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let shelley = tmp.path().join("shelley");
    std::fs::create_dir(&shelley).unwrap();
    std::fs::write(
        shelley.join("genesis.json"),
        r#"{
            "slotLength": 0.2,
            "epochLength": 1000,
            "slotsPerKESPeriod": 129600,
            "maxKESEvolutions": 62,
            "networkMagic": 42,
            "securityParam": 10
        }"#,
    )
    .unwrap();
    std::fs::write(shelley.join("genesis.conway.json"), "{}").unwrap();
    tmp
}

fn cluster_with(tmp: &TempDir, runner: &FakeRunner) -> ClusterLib {
    ClusterLib::builder(tmp.path())
        .runner(Box::new(runner.clone()))
        .build()
        .unwrap()
}

fn s(path: impl AsRef<Path>) -> String {
    path.as_ref().to_string_lossy().into_owned()
}

const TIP_JSON: &str = r#"{
    "block": 123, "epoch": 4, "era": "Conway",
    "hash": "d7dc82b6edcb19e16a6e1b0a711e7a55b7b4b9e5b2d8f29d4a2f0a9b6c9d0e1f",
    "slot": 4100, "slotInEpoch": 200, "slotsToEpochEnd": 800,
    "syncProgress": "100.00"
}"#;

#[tokio::test]
async fn builds_payment_address_command() {
    let tmp = state_dir();
    let runner = FakeRunner::new(&[]);
    let cluster = cluster_with(&tmp, &runner);

    let vkey = tmp.path().join("user.vkey");
    let stake_vkey = tmp.path().join("user_stake.vkey");
    let addr = cluster
        .address()
        .gen_payment_addr(
            "user",
            &PaymentCredential::VkeyFile(vkey.clone()),
            Some(&StakeCredential::VkeyFile(stake_vkey.clone())),
            tmp.path(),
        )
        .await
        .unwrap();

    assert_eq!(addr, "addr_test1vzfake");
    assert_eq!(
        runner.calls(),
        vec![vec![
            "cardano-cli".to_string(),
            "latest".to_string(),
            "address".to_string(),
            "build".to_string(),
            "--testnet-magic".to_string(),
            "42".to_string(),
            "--payment-verification-key-file".to_string(),
            s(&vkey),
            "--stake-verification-key-file".to_string(),
            s(&stake_vkey),
            "--out-file".to_string(),
            s(tmp.path().join("user.addr")),
        ]]
    );
}

#[tokio::test]
async fn queries_tip_and_parses_fields() {
    let tmp = state_dir();
    let runner = FakeRunner::new(&[TIP_JSON]);
    let cluster = cluster_with(&tmp, &runner);

    let tip = cluster.query().get_tip().await.unwrap();
    assert_eq!(tip.block, 123);
    assert_eq!(tip.epoch, 4);
    assert_eq!(tip.era, "Conway");
    assert_eq!(tip.slot, 4100);
    assert_eq!(tip.slots_to_epoch_end, Some(800));
    assert_eq!(tip.sync_progress_pct(), Some(100.0));

    assert_eq!(
        runner.calls(),
        vec![vec![
            "cardano-cli".to_string(),
            "latest".to_string(),
            "query".to_string(),
            "tip".to_string(),
            "--testnet-magic".to_string(),
            "42".to_string(),
        ]]
    );
}

#[tokio::test]
async fn derives_slots_offset_from_tip_once() {
    let tmp = state_dir();
    let runner = FakeRunner::new(&[TIP_JSON]);
    let cluster = cluster_with(&tmp, &runner);

    // epoch_length * (epoch + 1) - (slot + slotsToEpochEnd)
    // = 1000 * 5 - (4100 + 800) = 100
    assert_eq!(cluster.slots_offset().await.unwrap(), 100);
    assert_eq!(cluster.slots_offset().await.unwrap(), 100);
    // The tip is queried only for the first call.
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn configured_slots_offset_skips_the_tip_query() {
    let tmp = state_dir();
    let runner = FakeRunner::new(&[]);
    let cluster = ClusterLib::builder(tmp.path())
        .slots_offset(-20)
        .runner(Box::new(runner.clone()))
        .build()
        .unwrap();

    assert_eq!(cluster.slots_offset().await.unwrap(), -20);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn queries_utxos_by_address() {
    let tmp = state_dir();
    let runner = FakeRunner::new(&[r#"{
        "aa6f1e4d#0": {
            "address": "addr_test1real",
            "value": { "lovelace": 7000000 }
        }
    }"#]);
    let cluster = cluster_with(&tmp, &runner);

    let utxos = cluster
        .query()
        .get_utxo(UtxoSource::Address("addr_test1real"), &[])
        .await
        .unwrap();

    assert_eq!(utxos.len(), 1);
    assert_eq!(utxos[0].id(), "aa6f1e4d#0");
    assert_eq!(utxos[0].amount, 7_000_000);
    assert_eq!(utxos[0].address, "addr_test1real");

    assert_eq!(
        runner.calls(),
        vec![vec![
            "cardano-cli".to_string(),
            "latest".to_string(),
            "query".to_string(),
            "utxo".to_string(),
            "--output-json".to_string(),
            "--address".to_string(),
            "addr_test1real".to_string(),
            "--testnet-magic".to_string(),
            "42".to_string(),
        ]]
    );
}

#[tokio::test]
async fn signs_transaction_with_ordered_keys() {
    let tmp = state_dir();
    let runner = FakeRunner::new(&[]);
    let cluster = cluster_with(&tmp, &runner);

    let body = tmp.path().join("test_tx.body");
    std::fs::write(&body, "body").unwrap();
    let key1 = tmp.path().join("payment.skey");
    let key2 = tmp.path().join("stake.skey");

    let signed = cluster
        .transaction()
        .sign_tx(
            &[key1.clone(), key2.clone()],
            "test",
            &TxSource::BodyFile(body.clone()),
            tmp.path(),
        )
        .await
        .unwrap();

    assert_eq!(signed, tmp.path().join("test_tx.signed"));
    assert_eq!(
        runner.calls(),
        vec![vec![
            "cardano-cli".to_string(),
            "latest".to_string(),
            "transaction".to_string(),
            "sign".to_string(),
            "--tx-body-file".to_string(),
            s(&body),
            "--testnet-magic".to_string(),
            "42".to_string(),
            "--signing-key-file".to_string(),
            s(&key1),
            "--signing-key-file".to_string(),
            s(&key2),
            "--out-file".to_string(),
            s(&signed),
        ]]
    );
}

#[tokio::test]
async fn estimates_fee_through_cached_protocol_params() {
    let tmp = state_dir();
    let runner = FakeRunner::new(&["", "201389 Lovelace", "180000 Lovelace"]);
    let cluster = cluster_with(&tmp, &runner);

    let body = tmp.path().join("test_tx.body");
    std::fs::write(&body, "body").unwrap();

    let fee = cluster
        .transaction()
        .estimate_fee(&body, 1, 2, 3, 0)
        .await
        .unwrap();
    assert_eq!(fee, 201_389);

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    // The protocol parameters cache file is written first.
    assert_eq!(calls[0][2], "query");
    assert_eq!(calls[0][3], "protocol-parameters");
    assert_eq!(
        calls[1],
        vec![
            "cardano-cli".to_string(),
            "latest".to_string(),
            "transaction".to_string(),
            "calculate-min-fee".to_string(),
            "--testnet-magic".to_string(),
            "42".to_string(),
            "--protocol-params-file".to_string(),
            s(cluster.pparams_file()),
            "--tx-in-count".to_string(),
            "1".to_string(),
            "--tx-out-count".to_string(),
            "2".to_string(),
            "--byron-witness-count".to_string(),
            "0".to_string(),
            "--witness-count".to_string(),
            "3".to_string(),
            "--tx-body-file".to_string(),
            s(&body),
        ]
    );

    // The cached file is reused by the next estimation.
    let fee = cluster
        .transaction()
        .estimate_fee(&body, 1, 1, 1, 0)
        .await
        .unwrap();
    assert_eq!(fee, 180_000);
    assert_eq!(runner.calls().len(), 3);
}

#[tokio::test]
async fn submit_verifies_input_left_the_utxo_set() {
    let tmp = state_dir();
    // submit, tip for wait_for_new_block(0), utxo query comes back empty
    let runner = FakeRunner::new(&["", TIP_JSON, "{}"]);
    let cluster = cluster_with(&tmp, &runner);

    let tx_file = tmp.path().join("test_tx.signed");
    std::fs::write(&tx_file, "tx").unwrap();
    let txin = UtxoData::new("aa6f1e4d", 0, 7_000_000, "addr_test1real");

    cluster
        .transaction()
        .submit_tx(&tx_file, &[txin], 0)
        .await
        .unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[0],
        vec![
            "cardano-cli".to_string(),
            "latest".to_string(),
            "transaction".to_string(),
            "submit".to_string(),
            "--testnet-magic".to_string(),
            "42".to_string(),
            "--tx-file".to_string(),
            s(&tx_file),
        ]
    );
    // The spent input is looked up by its `hash#ix` id.
    assert!(calls[2].contains(&"--tx-in".to_string()));
    assert!(calls[2].contains(&"aa6f1e4d#0".to_string()));
}

#[tokio::test]
async fn registration_cert_carries_the_conway_deposit() {
    let tmp = state_dir();
    let runner = FakeRunner::new(&[]);
    let cluster = cluster_with(&tmp, &runner);

    let stake_vkey = tmp.path().join("user_stake.vkey");
    let cert = cluster
        .stake_address()
        .gen_stake_addr_registration_cert(
            "user",
            Some(2_000_000),
            &StakeCredential::VkeyFile(stake_vkey.clone()),
            tmp.path(),
        )
        .await
        .unwrap();

    assert_eq!(cert, tmp.path().join("user_stake_reg.cert"));
    assert_eq!(
        runner.calls(),
        vec![vec![
            "cardano-cli".to_string(),
            "latest".to_string(),
            "stake-address".to_string(),
            "registration-certificate".to_string(),
            "--key-reg-deposit-amt".to_string(),
            "2000000".to_string(),
            "--stake-verification-key-file".to_string(),
            s(&stake_vkey),
            "--out-file".to_string(),
            s(&cert),
        ]]
    );
}

#[tokio::test]
async fn pre_conway_registration_cert_has_no_deposit() {
    let tmp = state_dir();
    let runner = FakeRunner::new(&[]);
    let cluster = ClusterLib::builder(tmp.path())
        .command_era(CommandEra::Babbage)
        .runner(Box::new(runner.clone()))
        .build()
        .unwrap();

    let stake_vkey = tmp.path().join("user_stake.vkey");
    cluster
        .stake_address()
        .gen_stake_addr_registration_cert(
            "user",
            None,
            &StakeCredential::VkeyFile(stake_vkey),
            tmp.path(),
        )
        .await
        .unwrap();

    let calls = runner.calls();
    assert_eq!(calls[0][1], "babbage");
    assert!(!calls[0].contains(&"--key-reg-deposit-amt".to_string()));
}

#[tokio::test]
async fn parses_leadership_schedule_lines() {
    let tmp = state_dir();
    let runner = FakeRunner::new(&["\
     SlotNo                          UTC Time
-------------------------------------------------------------
     382                   2022-10-18 14:00:31.000384 UTC
     1021                  2022-10-18 14:02:39 UTC
"]);
    let cluster = cluster_with(&tmp, &runner);

    let vrf_skey = tmp.path().join("pool_vrf.skey");
    let pool_vkey = tmp.path().join("pool_cold.vkey");
    let schedule = cluster
        .query()
        .get_leadership_schedule(
            &vrf_skey,
            &cardano_clusterlib::records::PoolKey::ColdVkeyFile(pool_vkey),
            false,
        )
        .await
        .unwrap();

    assert_eq!(schedule.len(), 2);
    assert_eq!(schedule[0].slot_no, 382);
    assert_eq!(
        schedule[0].utc_time.to_rfc3339(),
        "2022-10-18T14:00:31.000384+00:00"
    );
    assert_eq!(schedule[1].slot_no, 1021);
    assert_eq!(schedule[1].utc_time.to_rfc3339(), "2022-10-18T14:02:39+00:00");

    let call = &runner.calls()[0];
    assert!(call.contains(&"leadership-schedule".to_string()));
    assert!(call.contains(&"--current".to_string()));
}

#[tokio::test]
async fn parses_stake_distribution_table() {
    let tmp = state_dir();
    let runner = FakeRunner::new(&["\
                           PoolId                                 Stake frac
------------------------------------------------------------------------------
pool1qqqqqdk4zhsjuxxd8jyvwncf5eucfskz0xjjj64fdmlgj735lr9   5.195e-2
pool1qqqqpanw9zc0rzh0yp247nzf2s35uvnsm7aaesfl2nnejaev0uc   3.198e-2
"]);
    let cluster = cluster_with(&tmp, &runner);

    let distribution = cluster.query().get_stake_distribution().await.unwrap();
    assert_eq!(distribution.len(), 2);
    assert_eq!(
        distribution["pool1qqqqqdk4zhsjuxxd8jyvwncf5eucfskz0xjjj64fdmlgj735lr9"],
        5.195e-2
    );
}

#[tokio::test]
async fn drep_certs_demand_a_concrete_credential() {
    let tmp = state_dir();
    let runner = FakeRunner::new(&[]);
    let cluster = cluster_with(&tmp, &runner);
    let gov = cluster.conway_governance().unwrap();

    let err = gov
        .drep()
        .gen_registration_cert(
            "member",
            500_000_000,
            &DrepCredential::AlwaysAbstain,
            None,
            None,
            tmp.path(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArguments(_)));
    assert!(runner.calls().is_empty());

    let drep_vkey = tmp.path().join("member_drep.vkey");
    let cert = gov
        .drep()
        .gen_registration_cert(
            "member",
            500_000_000,
            &DrepCredential::VkeyFile(drep_vkey.clone()),
            None,
            None,
            tmp.path(),
        )
        .await
        .unwrap();

    assert_eq!(
        runner.calls(),
        vec![vec![
            "cardano-cli".to_string(),
            "latest".to_string(),
            "governance".to_string(),
            "drep".to_string(),
            "registration-certificate".to_string(),
            "--drep-verification-key-file".to_string(),
            s(&drep_vkey),
            "--key-reg-deposit-amt".to_string(),
            "500000000".to_string(),
            "--out-file".to_string(),
            s(&cert),
        ]]
    );
}

#[tokio::test]
async fn anchor_data_is_hashed_without_an_era_prefix() {
    let tmp = state_dir();
    let runner = FakeRunner::new(&["abcdef0123456789"]);
    let cluster = cluster_with(&tmp, &runner);

    let hash = cluster
        .conway_governance()
        .unwrap()
        .get_anchor_data_hash(&AnchorContent::Text("my anchor".to_string()))
        .await
        .unwrap();

    assert_eq!(hash, "abcdef0123456789");
    assert_eq!(
        runner.calls(),
        vec![vec![
            "cardano-cli".to_string(),
            "hash".to_string(),
            "anchor-data".to_string(),
            "--text".to_string(),
            "my anchor".to_string(),
        ]]
    );
}

#[tokio::test]
async fn conway_governance_needs_a_conway_era() {
    let tmp = state_dir();
    let cluster = ClusterLib::builder(tmp.path())
        .command_era(CommandEra::Babbage)
        .runner(Box::new(FakeRunner::new(&[])))
        .build()
        .unwrap();

    assert!(matches!(
        cluster.conway_governance(),
        Err(Error::Config(_))
    ));
}

#[tokio::test]
async fn refuses_to_overwrite_existing_outfiles() {
    let tmp = state_dir();
    let runner = FakeRunner::new(&[]);
    let cluster = ClusterLib::builder(tmp.path())
        .overwrite_outfiles(false)
        .runner(Box::new(runner.clone()))
        .build()
        .unwrap();

    std::fs::write(tmp.path().join("user.vkey"), "existing").unwrap();
    let err = cluster
        .address()
        .gen_payment_key_pair("user", false, tmp.path())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::OutFileExists(_)));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn retries_transient_node_socket_failures() {
    let tmp = state_dir();
    let calls = Arc::new(Mutex::new(0));
    let cluster = ClusterLib::builder(tmp.path())
        .runner(Box::new(FailingRunner {
            calls: calls.clone(),
            transient_failures: 2,
            succeed_after: true,
        }))
        .build()
        .unwrap();

    let tip = cluster.query().get_tip().await.unwrap();
    assert_eq!(tip.block, 5);
    assert_eq!(*calls.lock().unwrap(), 3);
}

#[tokio::test]
async fn permanent_failures_are_not_retried() {
    let tmp = state_dir();
    let calls = Arc::new(Mutex::new(0));
    let cluster = ClusterLib::builder(tmp.path())
        .runner(Box::new(FailingRunner {
            calls: calls.clone(),
            transient_failures: 0,
            succeed_after: false,
        }))
        .build()
        .unwrap();

    let err = cluster.query().get_tip().await.unwrap_err();
    match err {
        Error::Cli { command, stderr } => {
            assert!(command.starts_with("cardano-cli latest query tip"));
            assert!(stderr.contains("fatal"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(*calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn builds_raw_transaction_with_balanced_change() {
    let tmp = state_dir();
    let runner = FakeRunner::new(&[]);
    let cluster = cluster_with(&tmp, &runner);

    let params = TxParams {
        txins: vec![UtxoData::new("aa6f1e4d", 0, 5_000_000, "addr_test1src")],
        txouts: vec![TxOut::new("addr_test1dst", 1_000_000)],
        ..Default::default()
    };
    let tx_raw = cluster
        .transaction()
        .build_raw_tx("addr_test1src", "test", 200_000, &params, tmp.path())
        .await
        .unwrap();

    assert_eq!(tx_raw.fee, 200_000);
    assert_eq!(tx_raw.out_file, tmp.path().join("test_tx.body"));
    assert_eq!(tx_raw.txouts_count, 2);
    // Change went back to the source address.
    assert!(tx_raw
        .txouts
        .iter()
        .any(|o| o.address == "addr_test1src" && o.amount == 3_800_000));

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call[2], "transaction");
    assert_eq!(call[3], "build-raw");
    assert!(call.windows(2).any(|w| w[0] == "--fee" && w[1] == "200000"));
    assert!(call
        .windows(2)
        .any(|w| w[0] == "--tx-in" && w[1] == "aa6f1e4d#0"));
    assert!(call
        .windows(2)
        .any(|w| w[0] == "--tx-out" && w[1] == "addr_test1dst+1000000"));
    assert!(call
        .windows(2)
        .any(|w| w[0] == "--tx-out" && w[1] == "addr_test1src+3800000"));
}

#[tokio::test]
async fn derives_deposit_from_certificate_files() {
    let tmp = state_dir();
    let runner = FakeRunner::new(&[]);
    let cluster = cluster_with(&tmp, &runner);

    // The fake runner leaves existing files alone, so the protocol parameters
    // "cache" can be seeded up front.
    std::fs::write(
        cluster.pparams_file(),
        r#"{"stakeAddressDeposit": 2000000, "stakePoolDeposit": 500000000}"#,
    )
    .unwrap();

    let cert = |name: &str, description: &str| {
        let path = tmp.path().join(name);
        std::fs::write(
            &path,
            format!(
                r#"{{"type": "CertificateShelley", "description": "{description}", "cborHex": ""}}"#
            ),
        )
        .unwrap();
        path
    };
    let stake_reg = cert("user_stake_reg.cert", "Stake Address Registration Certificate");
    let stake_dereg = cert(
        "user_stake_dereg.cert",
        "Stake Address Deregistration Certificate",
    );
    let pool_reg = cert("pool_reg.cert", "Stake Pool Registration Certificate");

    let tx_files = TxFiles {
        certificate_files: vec![stake_reg, pool_reg],
        ..Default::default()
    };
    assert_eq!(
        cluster.transaction().get_tx_deposit(&tx_files).await.unwrap(),
        502_000_000
    );

    let tx_files = TxFiles {
        certificate_files: vec![stake_dereg],
        ..Default::default()
    };
    assert_eq!(
        cluster.transaction().get_tx_deposit(&tx_files).await.unwrap(),
        -2_000_000
    );
}

#[tokio::test]
async fn records_cli_coverage_and_log() {
    let tmp = state_dir();
    let cli_log = tmp.path().join("cli.log");
    let runner = FakeRunner::new(&[TIP_JSON, TIP_JSON]);
    let cluster = ClusterLib::builder(tmp.path())
        .cli_log(&cli_log)
        .runner(Box::new(runner.clone()))
        .build()
        .unwrap();

    cluster.query().get_tip().await.unwrap();
    cluster.query().get_tip().await.unwrap();

    let coverage = cluster.cli_coverage();
    assert_eq!(coverage["cardano-cli"]["_count"], 2);
    assert_eq!(coverage["cardano-cli"]["latest"]["query"]["tip"]["_count"], 2);

    let log = std::fs::read_to_string(&cli_log).unwrap();
    assert_eq!(log.lines().count(), 2);
    assert!(log.contains("cardano-cli latest query tip --testnet-magic 42"));
}
