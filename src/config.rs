use crate::events::AppEvent;
use crate::menu::{Item, Rect};
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::{Srgb, Srgba, WithAlpha};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::f64::consts::PI;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

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
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[strum(serialize = "North", serialize = "n", serialize = "0")]
    North,
    #[strum(serialize = "NorthEast", serialize = "ne", serialize = "1")]
    NorthEast,
    #[strum(serialize = "East", serialize = "e", serialize = "2")]
    East,
    #[strum(serialize = "SouthEast", serialize = "se", serialize = "3")]
    SouthEast,
    #[strum(serialize = "South", serialize = "s", serialize = "4")]
    South,
    #[strum(serialize = "SouthWest", serialize = "sw", serialize = "5")]
    SouthWest,
    #[strum(serialize = "West", serialize = "w", serialize = "6")]
    West,
    #[strum(serialize = "NorthWest", serialize = "nw", serialize = "7")]
    NorthWest,
}

impl Direction {
    pub fn as_index(&self) -> usize {
        *self as usize
    }

    /// Screen-space angle, clockwise from east (y grows downwards), so north is `-PI / 2`.
    pub fn angle(&self) -> f64 {
        -PI / 2.0 + self.as_index() as f64 * PI / 4.0
    }
}

/// How items are distributed around the anchor.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Arrangement {
    /// Full circle, first item at `start`.
    #[default]
    #[strum(serialize = "ring", serialize = "circle")]
    Ring,
    /// Arc of `spread` degrees facing the middle of `bounds` (or `start` without bounds).
    #[strum(serialize = "fan", serialize = "arc")]
    Fan,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub arrangement: Arrangement,
    pub radius: f64,
    pub item_size: f64,
    pub min_hit_size: f64,
    pub start: Direction,
    pub spread: f64,
    pub bounds: Option<Rect>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            arrangement: Arrangement::Ring,
            radius: 120.0,
            item_size: 96.0,
            min_hit_size: 44.0,
            start: Direction::North,
            spread: 90.0,
            bounds: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid hex color '{0}'")]
pub struct ColorError(String);

/// Opaque RGB color, written as `#rrggbb` in config files.
#[derive(Debug, Clone, Copy, PartialEq, DeserializeFromStr, SerializeDisplay)]
pub struct Color(Srgba<f64>);

impl Color {
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue).into_format::<f64>().with_alpha(1.0))
    }

    pub fn components(&self) -> (f64, f64, f64, f64) {
        self.0.into_components()
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rgb: Srgb<u8> = s.trim().parse().map_err(|_| ColorError(s.to_string()))?;
        Ok(Self::from_rgb8(rgb.red, rgb.green, rgb.blue))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rgb: Srgb<u8> = self.0.color.into_format();
        write!(f, "#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
    }
}

/// Presentation parameters. The interaction controller never reads these.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Style {
    pub item_color: Color,
    pub item_active_color: Color,
    pub icon_color: Option<Color>,
    pub icon_active_color: Option<Color>,
    pub title_size: f64,
    pub title_color: Color,
    pub touch_point_color: Color,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            item_color: Color::from_rgb8(0xff, 0xff, 0xff),
            item_active_color: Color::from_rgb8(0xc6, 0x28, 0x28),
            icon_color: None,
            icon_active_color: None,
            title_size: 54.0,
            title_color: Color::from_rgb8(0x21, 0x21, 0x21),
            touch_point_color: Color::from_rgb8(0x21, 0x21, 0x21),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "ringmenu", "ringmenu").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Bundled defaults, then the user file, then `explicit`, then `RINGMENU_*` variables.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let user = get_config_path()
        .map_err(|e| log::debug!("Skipping user config: {}", e))
        .ok();
    load_layered(user.as_deref(), explicit, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("RINGMENU")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn load_layered(
    user: Option<&Path>,
    explicit: Option<&Path>,
    env: config::Environment,
) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder().add_source(config::File::from_str(
        DEFAULT_CONFIG,
        config::FileFormat::Toml,
    ));

    if let Some(path) = user {
        builder = builder.add_source(config::File::from(path).required(false));
    }

    if let Some(path) = explicit {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let s = builder.add_source(env).build()?;
    Ok(s.try_deserialize()?)
}

pub fn load_bundled() -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default(explicit: Option<&Path>) -> Config {
    match load_config(explicit) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            load_bundled().unwrap_or_default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
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
            ("\"north\"", Direction::North),
            ("\"North\"", Direction::North),
            ("\"NORTH\"", Direction::North),
            ("\"n\"", Direction::North),
            ("\"0\"", Direction::North),
            ("\"se\"", Direction::SouthEast),
            ("\"nw\"", Direction::NorthWest),
            ("\"NorthWest\"", Direction::NorthWest),
        ];

        for (json, expected) in cases {
            let deserialized: Direction = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_direction_angles() {
        assert!((Direction::North.angle() + PI / 2.0).abs() < 1e-9);
        assert!(Direction::East.angle().abs() < 1e-9);
        assert!((Direction::South.angle() - PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_arrangement_aliases() {
        let ring: Arrangement = serde_json::from_str("\"Circle\"").unwrap();
        let fan: Arrangement = serde_json::from_str("\"arc\"").unwrap();
        assert_eq!(ring, Arrangement::Ring);
        assert_eq!(fan, Arrangement::Fan);
        assert!(serde_json::from_str::<Arrangement>("\"spiral\"").is_err());
    }

    #[test]
    fn test_color_parsing() {
        let color: Color = "#c62828".parse().unwrap();
        assert_eq!(color, Color::from_rgb8(0xc6, 0x28, 0x28));
        assert_eq!(color.to_string(), "#c62828");
        assert_eq!(color.components().3, 1.0);
        assert!("not-a-color".parse::<Color>().is_err());
    }

    #[test]
    fn test_style_partial_deserialization() {
        let style: Style =
            serde_json::from_str(r##"{"item_active_color": "#00ff00", "title_size": 20.0}"##)
                .unwrap();
        assert_eq!(style.item_active_color, Color::from_rgb8(0, 0xff, 0));
        assert_eq!(style.title_size, 20.0);
        assert_eq!(style.item_color, Style::default().item_color);
        assert_eq!(style.icon_color, None);
    }

    #[test]
    fn test_layout_partial_deserialization() {
        let layout: LayoutConfig = serde_json::from_str(
            r#"{"arrangement": "fan", "bounds": {"x": 0.0, "y": 0.0, "width": 800.0, "height": 600.0}}"#,
        )
        .unwrap();
        assert_eq!(layout.arrangement, Arrangement::Fan);
        assert_eq!(layout.radius, LayoutConfig::default().radius);
        assert_eq!(layout.bounds, Some(Rect::new(0.0, 0.0, 800.0, 600.0)));
    }

    #[test]
    fn test_bundled_config_loads() {
        let config = load_bundled().unwrap();
        assert!(!config.items.is_empty());
        assert_eq!(config.layout.min_hit_size, 44.0);
        assert_eq!(config.style, Style::default());
    }

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    fn env_with(vars: &[(&str, &str)]) -> config::Environment {
        let mut map = config::Map::new();
        for (key, value) in vars {
            map.insert(key.to_string(), value.to_string());
        }
        environment().source(Some(map))
    }

    #[test]
    fn test_explicit_file_layers_over_user_and_bundled() {
        let user = fixture("user.toml");
        let explicit = fixture("explicit.toml");
        let config =
            load_layered(Some(user.as_path()), Some(explicit.as_path()), env_with(&[])).unwrap();

        // explicit beats user, user beats bundled, untouched keys keep the bundled value
        assert_eq!(config.layout.radius, 200.0);
        assert_eq!(config.layout.start, Direction::East);
        assert_eq!(config.layout.item_size, 96.0);
        assert_eq!(config.style.item_active_color, Color::from_rgb8(0, 0x80, 0));

        // arrays are replaced as a whole, not merged
        let ids: Vec<_> = config.items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["x"]);
    }

    #[test]
    fn test_missing_user_file_is_skipped() {
        let absent = fixture("absent.toml");
        let config = load_layered(Some(absent.as_path()), None, env_with(&[])).unwrap();
        assert_eq!(config.layout, LayoutConfig::default());
        assert!(!config.items.is_empty());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let absent = fixture("absent.toml");
        let result = load_layered(None, Some(absent.as_path()), env_with(&[]));
        assert!(matches!(result, Err(ConfigError::Config(_))));
    }

    #[test]
    fn test_environment_overrides_files() {
        let env = env_with(&[
            ("RINGMENU_LAYOUT__RADIUS", "140"),
            ("RINGMENU_LAYOUT__START", "2"),
            ("OTHER_LAYOUT__RADIUS", "10"),
        ]);
        let explicit = fixture("explicit.toml");
        let config = load_layered(None, Some(explicit.as_path()), env).unwrap();

        assert_eq!(config.layout.radius, 140.0);
        assert_eq!(config.layout.start, Direction::East);
        assert_eq!(config.items.len(), 1);
    }
}
