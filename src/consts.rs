//! Constants and small closed enums shared across the command groups.

use crate::error::{Error, Result};

/// Coin name of the native currency.
pub const DEFAULT_COIN: &str = "lovelace";

/// Network magic of the Cardano mainnet.
pub const MAINNET_MAGIC: u64 = 764_824_073;

/// Marker inserted into argument lists to flag the start of a subcommand.
///
/// Needed to tell options apart from subcommands when recording CLI coverage,
/// e.g. `query tx-mempool --cardano-mode info` is recorded as
/// `["query", "tx-mempool", "--cardano-mode", SUBCOMMAND_MARK, "info"]`.
/// The marker is stripped before the command is executed.
pub const SUBCOMMAND_MARK: &str = "SUBCOMMAND";

/// Ledger eras, ordered by introduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Era {
    /// Byron era.
    Byron = 1,
    /// Shelley era.
    Shelley = 2,
    /// Allegra era.
    Allegra = 3,
    /// Mary era.
    Mary = 4,
    /// Alonzo era.
    Alonzo = 6,
    /// Babbage era.
    Babbage = 8,
    /// Conway era.
    Conway = 9,
}

impl Era {
    /// The era used when none is requested explicitly.
    pub const DEFAULT: Era = Era::Conway;
    /// The newest era the wrapper knows about.
    pub const LATEST: Era = Era::Conway;

    /// Lowercase era name as used in CLI arguments.
    pub fn name(&self) -> &'static str {
        match self {
            Era::Byron => "byron",
            Era::Shelley => "shelley",
            Era::Allegra => "allegra",
            Era::Mary => "mary",
            Era::Alonzo => "alonzo",
            Era::Babbage => "babbage",
            Era::Conway => "conway",
        }
    }
}

/// Era keyword inserted after `cardano-cli` in every default invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandEra {
    /// `cardano-cli shelley ...`
    Shelley,
    /// `cardano-cli allegra ...`
    Allegra,
    /// `cardano-cli mary ...`
    Mary,
    /// `cardano-cli alonzo ...`
    Alonzo,
    /// `cardano-cli babbage ...`
    Babbage,
    /// `cardano-cli conway ...`
    Conway,
    /// `cardano-cli latest ...`
    Latest,
}

impl CommandEra {
    /// The keyword as passed on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandEra::Shelley => "shelley",
            CommandEra::Allegra => "allegra",
            CommandEra::Mary => "mary",
            CommandEra::Alonzo => "alonzo",
            CommandEra::Babbage => "babbage",
            CommandEra::Conway => "conway",
            CommandEra::Latest => "latest",
        }
    }

    /// The ledger era the keyword resolves to.
    pub fn era(&self) -> Era {
        match self {
            CommandEra::Shelley => Era::Shelley,
            CommandEra::Allegra => Era::Allegra,
            CommandEra::Mary => Era::Mary,
            CommandEra::Alonzo => Era::Alonzo,
            CommandEra::Babbage => Era::Babbage,
            CommandEra::Conway => Era::Conway,
            CommandEra::Latest => Era::LATEST,
        }
    }

    /// Parse an era keyword, case-insensitively.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "shelley" => Ok(CommandEra::Shelley),
            "allegra" => Ok(CommandEra::Allegra),
            "mary" => Ok(CommandEra::Mary),
            "alonzo" => Ok(CommandEra::Alonzo),
            "babbage" => Ok(CommandEra::Babbage),
            "conway" => Ok(CommandEra::Conway),
            "latest" => Ok(CommandEra::Latest),
            other => Err(Error::Config(format!("unknown command era `{other}`"))),
        }
    }
}

impl Default for CommandEra {
    fn default() -> Self {
        CommandEra::Latest
    }
}

/// Governance vote choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Vote {
    /// Vote in favor.
    Yes,
    /// Vote against.
    No,
    /// Abstain from the vote.
    Abstain,
}

impl Vote {
    pub(crate) fn arg(&self) -> &'static str {
        match self {
            Vote::Yes => "--yes",
            Vote::No => "--no",
            Vote::Abstain => "--abstain",
        }
    }
}

/// Multi-signature script kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MultiSigType {
    /// All listed keys must sign.
    All,
    /// Any single listed key may sign.
    Any,
    /// At least `required` of the listed keys must sign.
    AtLeast,
}

impl MultiSigType {
    /// The type string used in the script JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            MultiSigType::All => "all",
            MultiSigType::Any => "any",
            MultiSigType::AtLeast => "atLeast",
        }
    }
}

/// Slot-based validity conditions of multi-signature scripts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MultiSlotType {
    /// Valid before the given slot.
    Before,
    /// Valid after the given slot.
    After,
}

impl MultiSlotType {
    /// The type string used in the script JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            MultiSlotType::Before => "before",
            MultiSlotType::After => "after",
        }
    }
}

/// Script language of a reference script input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScriptType {
    /// Simple script, version 1.
    SimpleV1,
    /// Simple script, version 2.
    SimpleV2,
    /// Plutus script, version 1.
    PlutusV1,
    /// Plutus script, version 2.
    PlutusV2,
    /// Plutus script, version 3.
    PlutusV3,
}

impl ScriptType {
    /// Whether this is one of the simple (non-Plutus) script kinds.
    pub fn is_simple(&self) -> bool {
        matches!(self, ScriptType::SimpleV1 | ScriptType::SimpleV2)
    }
}
