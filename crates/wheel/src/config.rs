use crate::menu::geometry::{GeometryError, Layout, Point, SegmentGeometry};
use crate::menu::{
    ACTIVATION_THRESHOLD, FRAME_RATE, GAP_DEGREES, IDLE_TIMEOUT_SECS, INTENT_THRESHOLD,
    MIN_FRAME_RATE, OptionId, OptionRow, SEGMENT_COUNT,
};
use derive_more::{AsRef, Deref, Display, From, Into};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use padlink::{ButtonMap, SocketPath};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::path::{Path, PathBuf};
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

/// Compass names for the segments of an 8-way wheel, starting straight down
/// and going round through the right-hand side.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[strum(serialize = "South", serialize = "s", serialize = "0")]
    South,
    #[strum(serialize = "SouthEast", serialize = "se", serialize = "1")]
    SouthEast,
    #[strum(serialize = "East", serialize = "e", serialize = "2")]
    East,
    #[strum(serialize = "NorthEast", serialize = "ne", serialize = "3")]
    NorthEast,
    #[strum(serialize = "North", serialize = "n", serialize = "4")]
    North,
    #[strum(serialize = "NorthWest", serialize = "nw", serialize = "5")]
    NorthWest,
    #[strum(serialize = "West", serialize = "w", serialize = "6")]
    West,
    #[strum(serialize = "SouthWest", serialize = "sw", serialize = "7")]
    SouthWest,
}

impl Direction {
    pub fn as_index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::iter().nth(idx % 8)
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct CategoryName(String);

padlink::impl_string_newtype!(CategoryName);

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SegmentConfig {
    /// Compass name, only meaningful on an 8-way wheel.
    pub direction: Option<Direction>,
    /// Raw segment index, for wheels of any size. Wins over `direction`.
    pub index: Option<usize>,
    /// Option identifiers in cycle order; `""` leaves a slot empty.
    #[serde(default)]
    pub options: Vec<String>,
}

impl SegmentConfig {
    pub fn slot(&self) -> Option<usize> {
        self.index.or(self.direction.map(|d| d.as_index()))
    }

    pub fn row(&self) -> OptionRow {
        self.options
            .iter()
            .map(|o| (!o.trim().is_empty()).then(|| OptionId::new(o.trim())))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryConfig {
    pub name: CategoryName,
    #[serde(default)]
    pub segments: Vec<SegmentConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WheelSettings {
    pub segment_count: usize,
    pub gap_degrees: f64,
    pub activation_threshold: f64,
    pub intent_threshold: f64,
    pub idle_timeout_secs: f64,
    pub frame_rate: f64,
    pub default_segment: Option<usize>,
    pub center_x: f64,
    pub center_y: f64,
    pub base_radius: f64,
    pub inner_radius_factor: f64,
    pub outer_radius_factor: f64,
    pub socket_path: SocketPath,
}

impl Default for WheelSettings {
    fn default() -> Self {
        Self {
            segment_count: SEGMENT_COUNT,
            gap_degrees: GAP_DEGREES,
            activation_threshold: ACTIVATION_THRESHOLD,
            intent_threshold: INTENT_THRESHOLD,
            idle_timeout_secs: IDLE_TIMEOUT_SECS,
            frame_rate: FRAME_RATE,
            default_segment: None,
            center_x: 400.0,
            center_y: 300.0,
            base_radius: 250.0,
            inner_radius_factor: 0.35,
            outer_radius_factor: 1.0,
            socket_path: SocketPath::default(),
        }
    }
}

impl WheelSettings {
    pub fn layout(&self) -> Layout {
        Layout {
            center: Point::new(self.center_x, self.center_y),
            base_radius: self.base_radius,
            inner_radius_factor: self.inner_radius_factor,
            outer_radius_factor: self.outer_radius_factor,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub wheel: WheelSettings,
    #[serde(default)]
    pub buttons: ButtonMap,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("At least one category is required")]
    NoCategories,
    #[error("Category '{category}' places options on segment {index}, but the wheel has {count}")]
    SegmentOutOfRange {
        category: CategoryName,
        index: usize,
        count: usize,
    },
    #[error("Category '{0}' has a segment without a direction or index")]
    UnplacedSegment(CategoryName),
    #[error(
        "Thresholds must satisfy 0 <= intent ({intent}) < activation ({activation})"
    )]
    Thresholds { intent: f64, activation: f64 },
    #[error("Invalid timing: {0}")]
    Timing(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.wheel;

        if self.categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }

        if !(w.intent_threshold >= 0.0 && w.intent_threshold < w.activation_threshold) {
            return Err(ConfigError::Thresholds {
                intent: w.intent_threshold,
                activation: w.activation_threshold,
            });
        }

        if !(w.frame_rate.is_finite() && w.frame_rate >= MIN_FRAME_RATE) {
            return Err(ConfigError::Timing(format!(
                "frame_rate must be at least {}, got {}",
                MIN_FRAME_RATE, w.frame_rate
            )));
        }

        if !(w.idle_timeout_secs.is_finite() && w.idle_timeout_secs > 0.0) {
            return Err(ConfigError::Timing(format!(
                "idle_timeout_secs must be positive, got {}",
                w.idle_timeout_secs
            )));
        }

        SegmentGeometry::new(w.segment_count, w.gap_degrees, w.layout())?;

        for cat in &self.categories {
            for seg in &cat.segments {
                let index = seg
                    .slot()
                    .ok_or_else(|| ConfigError::UnplacedSegment(cat.name.clone()))?;
                if index >= w.segment_count {
                    return Err(ConfigError::SegmentOutOfRange {
                        category: cat.name.clone(),
                        index,
                        count: w.segment_count,
                    });
                }
            }
        }

        if let Some(index) = w.default_segment
            && index >= w.segment_count
        {
            return Err(ConfigError::SegmentOutOfRange {
                category: self.categories[0].name.clone(),
                index,
                count: w.segment_count,
            });
        }

        Ok(())
    }

    /// Option rows indexed `[category][segment]`. Segments nobody configured
    /// get an empty row.
    pub fn option_rows(&self) -> Vec<Vec<OptionRow>> {
        self.categories
            .iter()
            .map(|cat| {
                let mut rows = vec![OptionRow::new(); self.wheel.segment_count];
                let len = rows.len();
                cat.segments
                    .iter()
                    .filter_map(|seg| seg.slot().map(|i| (i, seg)))
                    .filter(|(i, _)| *i < len)
                    .for_each(|(i, seg)| rows[i] = seg.row());
                rows
            })
            .collect()
    }

    pub fn category_names(&self) -> Vec<CategoryName> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }
}

/// Anchors a path given on the command line to the working directory, so
/// that `wheel.toml` still has a parent directory to watch.
pub fn absolute_config_path(path: &Path) -> Result<PathBuf, ConfigError> {
    Ok(std::path::absolute(path)?)
}

/// The file to match watch events against and the directory to watch.
fn watch_target(config_path: &Path) -> Result<(PathBuf, PathBuf), ConfigError> {
    let file = absolute_config_path(config_path)?;
    let dir = file
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "config path has no parent"))?;
    Ok((file, dir))
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "troia", "wheel").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

// `WHEEL__WHEEL__SOCKET_PATH` overrides `wheel.socket_path`, and so on.
fn env_overrides() -> config::Environment {
    config::Environment::with_prefix("WHEEL").separator("__")
}

fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Config, ConfigError> {
    let s = builder.add_source(env_overrides()).build()?;

    let config: Config = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    build(config::Config::builder().add_source(config::File::from(path).required(false)))
}

pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    build(
        config::Config::builder().add_source(config::File::from_str(toml, config::FileFormat::Toml)),
    )
}

pub fn default_config() -> Config {
    // the embedded file is covered by tests
    parse_config(DEFAULT_CONFIG).unwrap_or_default()
}

/// Loads the user config, falling back to the built-in wheel when there is
/// none or it is broken.
pub fn load_or_default(path: Option<&Path>) -> Config {
    let path = match path.map(Path::to_path_buf).map_or_else(get_config_path, Ok) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("{}, using built-in wheel", e);
            return default_config();
        }
    };

    if !path.exists() {
        log::info!("No config at {}, using built-in wheel", path.display());
        return default_config();
    }

    match load_config(&path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load {}: {}", path.display(), e);
            default_config()
        }
    }
}

pub fn write_default_config(path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => get_config_path()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?,
    };
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let (config_path, config_dir) = match watch_target(&config_path) {
        Ok(target) => target,
        Err(e) => {
            log::error!("Cannot watch {}: {}", config_path.display(), e);
            return;
        }
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_deserialization() {
        let cases = vec![
            ("\"south\"", Direction::South),
            ("\"South\"", Direction::South),
            ("\"SOUTH\"", Direction::South),
            ("\"s\"", Direction::South),
            ("\"0\"", Direction::South),
            ("\"e\"", Direction::East),
            ("\"n\"", Direction::North),
            ("\"4\"", Direction::North),
            ("\"sw\"", Direction::SouthWest),
            ("\"NorthWest\"", Direction::NorthWest),
        ];

        for (json, expected) in cases {
            let deserialized: Direction = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_direction_indices_follow_the_compass() {
        assert_eq!(Direction::South.as_index(), 0);
        assert_eq!(Direction::East.as_index(), 2);
        assert_eq!(Direction::North.as_index(), 4);
        assert_eq!(Direction::West.as_index(), 6);
        assert_eq!(Direction::from_index(9), Some(Direction::SouthEast));
    }

    #[test]
    fn test_bare_file_name_gets_a_watchable_parent() {
        let (file, dir) = watch_target(Path::new("wheel.toml")).unwrap();
        assert!(file.is_absolute());
        assert_eq!(file.file_name().unwrap(), "wheel.toml");
        assert_eq!(dir, std::env::current_dir().unwrap());
        assert_eq!(file.parent(), Some(dir.as_path()));
    }

    #[test]
    fn test_absolute_config_path_is_kept() {
        let path = std::env::temp_dir().join("wheel").join("config.toml");
        let (file, dir) = watch_target(&path).unwrap();
        assert_eq!(file, path);
        assert_eq!(dir, std::env::temp_dir().join("wheel"));
    }

    #[test]
    fn test_frame_rate_lower_bound() {
        let err = parse_config(
            r#"
            [wheel]
            frame_rate = 1e-20

            [[categories]]
            name = "Camera"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Timing(_)));
    }

    #[test]
    fn test_default_rows_with_choices_are_scrollable() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        for row in config.option_rows().iter().flatten() {
            if row.iter().flatten().count() > 1 {
                assert!(row.get(1).is_some_and(Option::is_some), "{:?}", row);
            }
        }
    }

    #[test]
    fn test_socket_override_matches_padlink() {
        let vars = [(padlink::ipc::SOCKET_PATH_ENV.to_string(), "/run/wheel.sock".to_string())]
            .into_iter()
            .collect::<config::Map<_, _>>();
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                "[[categories]]\nname = \"Camera\"\n",
                config::FileFormat::Toml,
            ))
            .add_source(env_overrides().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.wheel.socket_path, SocketPath::from("/run/wheel.sock"));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.wheel, WheelSettings::default());
        assert!(!config.categories.is_empty());
        assert_eq!(config.buttons, ButtonMap::default());
    }

    #[test]
    fn test_option_rows() {
        let config = parse_config(
            r#"
            [wheel]
            segment_count = 4

            [[categories]]
            name = "Camera"

            [[categories.segments]]
            direction = "s"
            options = ["orbit", "", "free"]

            [[categories.segments]]
            index = 3
            options = ["photo"]
            "#,
        )
        .unwrap();

        let rows = config.option_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 4);
        assert_eq!(
            rows[0][0],
            vec![Some(OptionId::from("orbit")), None, Some(OptionId::from("free"))]
        );
        assert!(rows[0][1].is_empty());
        assert_eq!(rows[0][3], vec![Some(OptionId::from("photo"))]);
        assert_eq!(config.category_names(), vec![CategoryName::from("Camera")]);
    }

    #[test]
    fn test_rejects_segment_outside_wheel() {
        let err = parse_config(
            r#"
            [wheel]
            segment_count = 4

            [[categories]]
            name = "Tools"

            [[categories.segments]]
            direction = "w"
            options = ["axe"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SegmentOutOfRange { index: 6, count: 4, .. }
        ));
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let err = parse_config(
            r#"
            [wheel]
            activation_threshold = 0.3
            intent_threshold = 0.5

            [[categories]]
            name = "Tools"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Thresholds { .. }));
    }

    #[test]
    fn test_rejects_empty_config() {
        assert!(matches!(parse_config(""), Err(ConfigError::NoCategories)));
    }

    #[test]
    fn test_segment_needs_placement() {
        let err = parse_config(
            r#"
            [[categories]]
            name = "Tools"

            [[categories.segments]]
            options = ["axe"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnplacedSegment(_)));
    }
}
