//! Run configuration.
//!
//! Values are layered, later layers winning: built-in defaults, the TOML
//! file given with `--config`, the `ORDEX_DROP_ROOT` / `ORDEX_DROP_DIR`
//! environment variables, then command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use ordex_model::{
    Carrier, CarrierCatalog, CarrierMode, ConfigError, DEFAULT_ORDER_BASE, ExportOptions,
    OrderNumbering, OrderState, PartialSplit, RandomScope, StateMode,
};

/// Drop directory used when nothing else is configured.
pub const DEFAULT_DROP_DIR: &str = "refonteTest";

pub const ENV_DROP_ROOT: &str = "ORDEX_DROP_ROOT";
pub const ENV_DROP_DIR: &str = "ORDEX_DROP_DIR";

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub export: ExportSection,
    pub drop: DropSection,
    /// Extra or overriding catalog entries, matched by id.
    pub carriers: Vec<Carrier>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSection {
    pub states: Vec<String>,
    pub carriers: Vec<String>,
    pub mode: Option<StateMode>,
    pub random_scope: Option<RandomScope>,
    pub carrier_mode: Option<CarrierMode>,
    pub order_numbering: Option<OrderNumbering>,
    pub order_base: Option<u64>,
    pub max_orders: Option<usize>,
    pub seed: Option<u64>,
    pub delimiter: Option<char>,
    pub partial_split: Option<SplitSection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitSection {
    pub quantity: u32,
    #[serde(default)]
    pub state_a: Option<String>,
    #[serde(default)]
    pub state_b: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DropSection {
    pub root: Option<PathBuf>,
    pub dir: Option<String>,
    pub fallback_dir: Option<PathBuf>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("parse config file {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Environment layer, captured once so resolution stays a pure function.
#[derive(Debug, Clone, Default)]
pub struct EnvLayer {
    pub drop_root: Option<PathBuf>,
    pub drop_dir: Option<String>,
}

impl EnvLayer {
    pub fn from_process() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            drop_root: non_empty(ENV_DROP_ROOT).map(PathBuf::from),
            drop_dir: non_empty(ENV_DROP_DIR),
        }
    }
}

/// Values given on the command line. Empty lists and `None` defer to the
/// lower layers.
#[derive(Debug, Clone, Default)]
pub struct FlagLayer {
    pub states: Vec<String>,
    pub carriers: Vec<String>,
    pub mode: Option<StateMode>,
    pub random_per_line: bool,
    pub mixed_carriers: bool,
    pub order_numbering: Option<OrderNumbering>,
    pub order_base: Option<u64>,
    pub max_orders: Option<usize>,
    pub split_quantity: Option<u32>,
    pub split_state_a: Option<String>,
    pub split_state_b: Option<String>,
    pub seed: Option<u64>,
    pub delimiter: Option<char>,
    pub drop_root: Option<PathBuf>,
    pub drop_dir: Option<String>,
    pub fallback_dir: Option<PathBuf>,
}

/// Where delivered files land: `root/dir/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub root: PathBuf,
    pub dir: String,
}

impl DropTarget {
    pub fn path(&self) -> PathBuf {
        self.root.join(&self.dir)
    }
}

/// Sink settings shared by every command that delivers files.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    pub drop: DropTarget,
    pub fallback_dir: Option<PathBuf>,
}

/// Fully resolved export configuration.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub options: ExportOptions,
    pub catalog: CarrierCatalog,
    /// Field separator of the source table.
    pub source_delimiter: u8,
    pub delivery: DeliveryConfig,
}

/// Built-in catalog with file entries applied on top.
pub fn merged_catalog(file: &ConfigFile) -> CarrierCatalog {
    let mut carriers = CarrierCatalog::default().carriers().to_vec();
    for entry in &file.carriers {
        match carriers
            .iter_mut()
            .find(|known| known.id.eq_ignore_ascii_case(&entry.id))
        {
            Some(known) => *known = entry.clone(),
            None => carriers.push(entry.clone()),
        }
    }
    CarrierCatalog::new(carriers)
}

fn parse_states(values: &[String]) -> Result<Vec<OrderState>, ConfigError> {
    values
        .iter()
        .map(|value| value.parse::<OrderState>().map_err(ConfigError::UnknownState))
        .collect()
}

fn parse_optional_state(value: Option<&String>) -> Result<Option<OrderState>, ConfigError> {
    value
        .map(|value| value.parse::<OrderState>().map_err(ConfigError::UnknownState))
        .transpose()
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    match u8::try_from(delimiter) {
        Ok(byte) if byte.is_ascii() && !byte.is_ascii_alphanumeric() => Ok(byte),
        _ => bail!("unsupported source delimiter {delimiter:?}"),
    }
}

/// Resolves the drop target and fallback directory only.
pub fn resolve_delivery(file: &ConfigFile, env: &EnvLayer, flags: &FlagLayer) -> DeliveryConfig {
    let root = flags
        .drop_root
        .clone()
        .or_else(|| env.drop_root.clone())
        .or_else(|| file.drop.root.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let dir = flags
        .drop_dir
        .clone()
        .or_else(|| env.drop_dir.clone())
        .or_else(|| file.drop.dir.clone())
        .unwrap_or_else(|| DEFAULT_DROP_DIR.to_string());
    DeliveryConfig {
        drop: DropTarget { root, dir },
        fallback_dir: flags
            .fallback_dir
            .clone()
            .or_else(|| file.drop.fallback_dir.clone()),
    }
}

/// Applies every layer and validates the result.
pub fn resolve(file: &ConfigFile, env: &EnvLayer, flags: &FlagLayer) -> Result<ResolvedConfig> {
    let section = &file.export;
    let catalog = merged_catalog(file);

    let state_names = if flags.states.is_empty() {
        &section.states
    } else {
        &flags.states
    };
    let states = parse_states(state_names)?;

    let carrier_ids = if flags.carriers.is_empty() {
        &section.carriers
    } else {
        &flags.carriers
    };
    let carriers = catalog
        .select(carrier_ids)
        .map_err(ConfigError::UnknownCarrier)?;

    let random_scope = if flags.random_per_line {
        RandomScope::PerLine
    } else {
        section.random_scope.unwrap_or_default()
    };
    let carrier_mode = if flags.mixed_carriers {
        CarrierMode::Mixed
    } else {
        section.carrier_mode.unwrap_or_default()
    };

    let split_quantity = flags
        .split_quantity
        .or_else(|| section.partial_split.as_ref().map(|split| split.quantity));
    let partial_split = match split_quantity {
        Some(quantity) => {
            let from_file = section.partial_split.as_ref();
            let state_a = flags
                .split_state_a
                .as_ref()
                .or_else(|| from_file.and_then(|split| split.state_a.as_ref()));
            let state_b = flags
                .split_state_b
                .as_ref()
                .or_else(|| from_file.and_then(|split| split.state_b.as_ref()));
            Some(PartialSplit {
                quantity,
                state_a: parse_optional_state(state_a)?,
                state_b: parse_optional_state(state_b)?,
            })
        }
        None => None,
    };

    let options = ExportOptions::new(states, carriers)
        .with_mode(flags.mode.or(section.mode).unwrap_or_default())
        .with_random_scope(random_scope)
        .with_carrier_mode(carrier_mode)
        .with_order_numbering(
            flags
                .order_numbering
                .or(section.order_numbering)
                .unwrap_or_default(),
        )
        .with_order_base(
            flags
                .order_base
                .or(section.order_base)
                .unwrap_or(DEFAULT_ORDER_BASE),
        )
        .with_max_orders(flags.max_orders.or(section.max_orders))
        .with_partial_split(partial_split)
        .with_seed(flags.seed.or(section.seed));
    options.validate()?;

    let source_delimiter = delimiter_byte(flags.delimiter.or(section.delimiter).unwrap_or(','))?;

    Ok(ResolvedConfig {
        options,
        catalog,
        source_delimiter,
        delivery: resolve_delivery(file, env, flags),
    })
}
