#![warn(missing_docs)]

//! Typed wrapper around `cardano-cli` for driving a local Cardano cluster.
//!
//! The entry point is [`ClusterLib`]: it reads the cluster's genesis files,
//! knows the network magic and node socket, and hands out command groups for
//! the individual CLI subcommand families:
//!
//! ```no_run
//! use cardano_clusterlib::{ClusterLib, records::TxOut, transaction::TxParams};
//!
//! # async fn example() -> cardano_clusterlib::Result<()> {
//! let cluster = ClusterLib::new("/path/to/cluster-state")?;
//!
//! let tip = cluster.query().get_tip().await?;
//! println!("tip is at slot {}", tip.slot);
//!
//! let params = TxParams {
//!     txouts: vec![TxOut::new("addr_test1...", 2_000_000)],
//!     ..Default::default()
//! };
//! cluster
//!     .transaction()
//!     .send_tx("addr_test1...", "example", None, &params, true, ".".as_ref())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod cluster;
pub mod consts;
pub mod conway;
pub mod coverage;
pub mod error;
pub mod files;
pub mod genesis;
pub mod governance;
pub mod key;
pub mod node;
pub mod query;
pub mod records;
pub mod runner;
pub mod slots;
pub mod stake_address;
pub mod stake_pool;
pub mod transaction;
pub mod txtools;
pub mod utxo;

pub use cluster::{ClusterLib, ClusterLibBuilder};
pub use consts::{CommandEra, Era, MultiSigType, MultiSlotType, ScriptType, Vote, DEFAULT_COIN, MAINNET_MAGIC};
pub use error::{Error, Result};
pub use query::{Tip, UtxoSource};
pub use records::{TxFiles, TxOut};
pub use runner::{CardanoCliRunner, CliOut, CliRunner, RunOutput};
pub use utxo::UtxoData;
