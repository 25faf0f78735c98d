//! TOML configuration for the Mandelbrot viewer.
//!
//! Every key is optional; an empty document yields the stock 1920x1080 window
//! running at 4 FPS with the bundled shaders under `shaders/`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;
pub const DEFAULT_FPS: f32 = 4.0;
pub const DEFAULT_TITLE: &str = "Wisward's Mandelbrot Set";
pub const DEFAULT_RESOLUTION_UNIFORM: &str = "res";
pub const DEFAULT_VERTEX_SHADER: &str = "shaders/vertexShaderSource.glsl";
pub const DEFAULT_FRAGMENT_SHADER: &str = "shaders/fragmentShaderSource.glsl";
/// Longest accepted gap between frames, whether given as `fps` or `frame_interval`.
pub const MAX_FRAME_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to read configuration at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub window: WindowSection,
    #[serde(default)]
    pub render: RenderSection,
    #[serde(default)]
    pub shaders: ShaderSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowSection {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<f32>,
    #[serde(
        deserialize_with = "deserialize_duration_opt",
        serialize_with = "serialize_duration_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub frame_interval: Option<Duration>,
    pub resolution_uniform: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShaderSection {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            window: WindowSection::default(),
            render: RenderSection::default(),
            shaders: ShaderSection::default(),
        }
    }
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            fps: None,
            frame_interval: None,
            resolution_uniform: DEFAULT_RESOLUTION_UNIFORM.to_string(),
        }
    }
}

impl Default for ShaderSection {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from(DEFAULT_VERTEX_SHADER),
            fragment: PathBuf::from(DEFAULT_FRAGMENT_SHADER),
        }
    }
}

fn default_version() -> u32 {
    1
}

fn deserialize_duration_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Option<Duration>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(Duration::from_secs(v)))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs(v as u64)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() || v.is_infinite() {
                return Err(E::custom("duration must be a finite non-negative number"));
            }
            Duration::try_from_secs_f64(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration {v}: {err}")))
        }
    }

    deserializer.deserialize_any(Visitor)
}

fn serialize_duration_opt<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(duration) => {
            serializer.serialize_str(&humantime::format_duration(*duration).to_string())
        }
        None => serializer.serialize_none(),
    }
}

impl ViewConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: ViewConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// Reads and validates a config file.
    ///
    /// Relative shader paths are resolved against the directory holding the
    /// file so a config can travel together with its shaders.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents)?;
        if let Some(base) = path.parent() {
            config.shaders.vertex = rebase(base, &config.shaders.vertex);
            config.shaders.fragment = rebase(base, &config.shaders.fragment);
        }
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Effective frame rate: explicit `fps`, else the inverse of
    /// `frame_interval`, else [`DEFAULT_FPS`].
    pub fn target_fps(&self) -> f32 {
        match (self.render.fps, self.render.frame_interval) {
            (Some(fps), _) => fps,
            (None, Some(interval)) => (1.0 / interval.as_secs_f64()) as f32,
            (None, None) => DEFAULT_FPS,
        }
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.window.width, self.window.height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        match (self.render.fps, self.render.frame_interval) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::Invalid(
                    "render.fps and render.frame_interval are mutually exclusive".into(),
                ));
            }
            (Some(fps), None) => validate_fps(fps)?,
            (None, Some(interval)) => {
                if interval.is_zero() {
                    return Err(ConfigError::Invalid(
                        "render.frame_interval must be greater than zero".into(),
                    ));
                }
                if interval > MAX_FRAME_INTERVAL {
                    return Err(ConfigError::Invalid(format!(
                        "render.frame_interval must be at most {}, got {}",
                        humantime::format_duration(MAX_FRAME_INTERVAL),
                        humantime::format_duration(interval)
                    )));
                }
            }
            (None, None) => {}
        }

        validate_uniform_name(&self.render.resolution_uniform)?;

        if self.shaders.vertex.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("shaders.vertex may not be empty".into()));
        }
        if self.shaders.fragment.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "shaders.fragment may not be empty".into(),
            ));
        }

        Ok(())
    }
}

pub fn validate_fps(fps: f32) -> Result<(), ConfigError> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "fps must be a finite number greater than zero, got {fps}"
        )));
    }
    if f64::from(fps) * MAX_FRAME_INTERVAL.as_secs_f64() < 1.0 {
        return Err(ConfigError::Invalid(format!(
            "fps {fps} is too low; frames may be at most {} apart",
            humantime::format_duration(MAX_FRAME_INTERVAL)
        )));
    }
    Ok(())
}

/// GLSL identifiers: ASCII letter or underscore, then letters, digits, underscores.
pub fn validate_uniform_name(name: &str) -> Result<(), ConfigError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "resolution uniform name '{name}' is not a valid GLSL identifier"
        )))
    }
}

fn rebase(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || base.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
version = 1

[window]
width = 1280
height = 720
title = "Preview"

[render]
frame_interval = "250ms"
resolution_uniform = "ress"

[shaders]
vertex = "glsl/quad.vert"
fragment = "glsl/mandel.frag"
"#;

    #[test]
    fn parses_sample_config() {
        let config = ViewConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.surface_size(), (1280, 720));
        assert_eq!(config.window.title, "Preview");
        assert_eq!(
            config.render.frame_interval,
            Some(Duration::from_millis(250))
        );
        assert_eq!(config.render.resolution_uniform, "ress");
        assert_eq!(config.target_fps(), 4.0);
        assert_eq!(config.shaders.vertex, PathBuf::from("glsl/quad.vert"));
    }

    #[test]
    fn empty_document_matches_stock_program() {
        let config = ViewConfig::from_toml_str("").unwrap();
        assert_eq!(config, ViewConfig::default());
        assert_eq!(config.surface_size(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert_eq!(config.target_fps(), DEFAULT_FPS);
        assert_eq!(config.render.resolution_uniform, "res");
        assert_eq!(
            config.shaders.fragment,
            PathBuf::from("shaders/fragmentShaderSource.glsl")
        );
    }

    #[test]
    fn rejects_fps_together_with_interval() {
        let err = ViewConfig::from_toml_str(
            r#"
[render]
fps = 30
frame_interval = "1s"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_non_positive_fps() {
        for fps in ["0", "-2.5", "nan"] {
            let input = format!("[render]\nfps = {fps}\n");
            let err = ViewConfig::from_toml_str(&input).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "fps = {fps}");
        }
    }

    #[test]
    fn rejects_zero_window_size() {
        let err = ViewConfig::from_toml_str("[window]\nwidth = 0\n").unwrap_err();
        assert!(err.to_string().contains("non-zero"));
    }

    #[test]
    fn rejects_bad_uniform_names() {
        for name in ["", "2res", "res olution", "rés"] {
            assert!(validate_uniform_name(name).is_err(), "{name:?}");
        }
        assert!(validate_uniform_name("_res2").is_ok());
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = ViewConfig::from_toml_str("[window]\nfullscreen = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn numeric_intervals_are_seconds() {
        let config = ViewConfig::from_toml_str("[render]\nframe_interval = 0.5\n").unwrap();
        assert_eq!(config.target_fps(), 2.0);
    }

    #[test]
    fn out_of_range_numeric_interval_is_a_parse_error() {
        let err = ViewConfig::from_toml_str("[render]\nframe_interval = 1e30\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err}");
    }

    #[test]
    fn rejects_intervals_longer_than_the_cap() {
        for interval in ["\"2h\"", "86400", "3600.5"] {
            let input = format!("[render]\nframe_interval = {interval}\n");
            let err = ViewConfig::from_toml_str(&input).unwrap_err();
            assert!(err.to_string().contains("at most 1h"), "{interval}: {err}");
        }
        let config = ViewConfig::from_toml_str("[render]\nframe_interval = \"1h\"\n").unwrap();
        assert_eq!(config.render.frame_interval, Some(MAX_FRAME_INTERVAL));
    }

    #[test]
    fn rejects_vanishingly_small_fps() {
        for fps in ["1e-30", "0.0001"] {
            let input = format!("[render]\nfps = {fps}\n");
            let err = ViewConfig::from_toml_str(&input).unwrap_err();
            assert!(err.to_string().contains("too low"), "{fps}: {err}");
        }
        assert!(validate_fps(0.001).is_ok());
    }

    #[test]
    fn load_resolves_shader_paths_next_to_config() {
        let root = tempfile::TempDir::new().unwrap();
        let dir = root.path().to_path_buf();
        let path = dir.join("view.toml");
        fs::write(&path, "[shaders]\nvertex = \"a.vert\"\nfragment = \"/abs/b.frag\"\n").unwrap();

        let config = ViewConfig::load(&path).unwrap();
        assert_eq!(config.shaders.vertex, dir.join("a.vert"));
        assert_eq!(config.shaders.fragment, PathBuf::from("/abs/b.frag"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ViewConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn serialized_config_round_trips_interval() {
        let config = ViewConfig::from_toml_str(SAMPLE).unwrap();
        let rendered = config.to_toml_string().unwrap();
        assert!(rendered.contains("frame_interval = \"250ms\""));
        assert_eq!(ViewConfig::from_toml_str(&rendered).unwrap(), config);
    }
}
