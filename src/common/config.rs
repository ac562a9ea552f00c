use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::layout_engine::LayoutVariant;

pub fn config_file() -> PathBuf { dirs::home_dir().unwrap_or_default().join(".tessel.toml") }

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    settings: Settings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub default_layout: LayoutVariant,
    /// Variants visited by layout cycling, in order.
    #[serde(default = "default_layouts")]
    pub layouts: Vec<LayoutVariant>,
    #[serde(default = "yes")]
    pub drop_preview: bool,
    /// Lower bound for a tile's width or height after a user resize.
    #[serde(default = "default_min_tile_size")]
    pub min_tile_size: i32,
    #[serde(default)]
    pub wrap_focus: bool,
}

fn yes() -> bool { true }

fn default_layouts() -> Vec<LayoutVariant> { vec![LayoutVariant::Spiral, LayoutVariant::TwoThird] }

fn default_min_tile_size() -> i32 { 50 }

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_layout: LayoutVariant::default(),
            layouts: default_layouts(),
            drop_preview: true,
            min_tile_size: default_min_tile_size(),
            wrap_focus: false,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.layouts.is_empty() {
            issues.push("layouts must name at least one layout variant".to_string());
        }
        if !self.layouts.is_empty() && !self.layouts.contains(&self.default_layout) {
            issues.push(format!(
                "default_layout '{}' is not listed in layouts",
                self.default_layout
            ));
        }
        let mut seen = Vec::with_capacity(self.layouts.len());
        for variant in &self.layouts {
            if seen.contains(variant) {
                issues.push(format!("layout '{variant}' is listed more than once"));
            }
            seen.push(*variant);
        }
        if self.min_tile_size < 1 {
            issues.push(format!("min_tile_size must be at least 1, got {}", self.min_tile_size));
        }
        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;
        if self.layouts.is_empty() {
            self.layouts = default_layouts();
            fixes += 1;
        }
        let before = self.layouts.len();
        let mut seen = Vec::with_capacity(before);
        self.layouts.retain(|v| {
            let fresh = !seen.contains(v);
            seen.push(*v);
            fresh
        });
        fixes += before - self.layouts.len();
        if !self.layouts.contains(&self.default_layout) {
            self.layouts.push(self.default_layout);
            fixes += 1;
        }
        if self.min_tile_size < 1 {
            self.min_tile_size = 1;
            fixes += 1;
        }
        fixes
    }

    /// Position of `variant` in the cycle, if it takes part in it.
    pub fn layout_index(&self, variant: LayoutVariant) -> Option<usize> {
        self.layouts.iter().position(|&v| v == variant)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub settings: Settings,
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> {
        let file: ConfigFile = toml::from_str(buf)?;
        Ok(Config { settings: file.settings })
    }

    /// Reads `path` if it exists, falling back to defaults otherwise.
    pub fn read_or_default(path: &Path) -> anyhow::Result<Config> {
        if path.exists() { Self::read(path) } else { Ok(Self::default()) }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let file = ConfigFile { settings: self.settings.clone() };
        let toml_string = toml::to_string_pretty(&file)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;
        Ok(())
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> { self.settings.validate() }

    /// Returns the number of fixes applied.
    pub fn auto_fix_values(&mut self) -> usize { self.settings.auto_fix_values() }
}
