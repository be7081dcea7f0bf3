use std::{path::Path, str::FromStr};

use ini::{Ini, Properties};

use crate::{error::VRes, VTFError};

/// Upper bounds applied by header validation before any size arithmetic.
///
/// Source games ship at most 4096x4096, the defaults leave headroom above that.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DecoderLimits {
    pub max_dimension: u16,
    pub max_frames: u16,
    pub min_header_size: u32,
    pub max_header_size: u32,
    pub max_low_res_dimension: u8,
}

impl Default for DecoderLimits {
    fn default() -> Self {
        Self {
            max_dimension: 16384,
            max_frames: 1024,
            min_header_size: 64,
            max_header_size: 1024,
            max_low_res_dimension: 16,
        }
    }
}

impl DecoderLimits {
    /// Reads the `[limits]` section. Keys that are absent keep their default.
    pub fn from_ini(ini: &Ini) -> VRes<Self> {
        let mut limits = Self::default();

        let Some(section) = ini.section(Some("limits")) else {
            log::debug!("no [limits] section, using defaults");
            return Ok(limits);
        };

        read_key(section, "max_dimension", &mut limits.max_dimension)?;
        read_key(section, "max_frames", &mut limits.max_frames)?;
        read_key(section, "min_header_size", &mut limits.min_header_size)?;
        read_key(section, "max_header_size", &mut limits.max_header_size)?;
        read_key(
            section,
            "max_low_res_dimension",
            &mut limits.max_low_res_dimension,
        )?;

        if limits.min_header_size > limits.max_header_size {
            return Err(VTFError::Config(format!(
                "min_header_size {} exceeds max_header_size {}",
                limits.min_header_size, limits.max_header_size
            )));
        }

        Ok(limits)
    }

    pub fn load(path: impl AsRef<Path>) -> VRes<Self> {
        let ini = Ini::load_from_file(path)?;
        Self::from_ini(&ini)
    }
}

fn read_key<T: FromStr>(section: &Properties, key: &str, out: &mut T) -> VRes<()> {
    if let Some(value) = section.get(key) {
        *out = value
            .trim()
            .parse()
            .map_err(|_| VTFError::Config(format!("{key} = {value:?} is not a valid value")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_ini_gives_defaults() {
        let ini = Ini::load_from_str("").unwrap();
        assert_eq!(DecoderLimits::from_ini(&ini).unwrap(), DecoderLimits::default());
    }

    #[test]
    fn partial_section_overrides_named_keys() {
        let ini = Ini::load_from_str("[limits]\nmax_dimension = 4096\nmax_frames=8\n").unwrap();
        let limits = DecoderLimits::from_ini(&ini).unwrap();

        assert_eq!(
            limits,
            DecoderLimits {
                max_dimension: 4096,
                max_frames: 8,
                ..Default::default()
            }
        );
    }

    #[test]
    fn bad_values_are_rejected() {
        let ini = Ini::load_from_str("[limits]\nmax_frames = lots\n").unwrap();
        assert!(matches!(
            DecoderLimits::from_ini(&ini),
            Err(VTFError::Config(_))
        ));

        let ini = Ini::load_from_str("[limits]\nmin_header_size = 2048\n").unwrap();
        assert!(matches!(
            DecoderLimits::from_ini(&ini),
            Err(VTFError::Config(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("limits.ini");
        std::fs::write(&path, "[limits]\nmax_low_res_dimension = 32\n").unwrap();

        let limits = DecoderLimits::load(&path).unwrap();
        assert_eq!(limits.max_low_res_dimension, 32);
        assert_eq!(limits.max_dimension, 16384);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            DecoderLimits::load(dir.path().join("nope.ini")),
            Err(VTFError::Ini(_))
        ));
    }
}
