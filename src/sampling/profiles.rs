//! Cross-stream wake profiles
//!
//! A set of `nz` straight lines along y at a fixed streamwise position, each
//! sampled at `ny` points. Heights are spread evenly between `z_h_min * H`
//! and `z_h_max * H`.

use crate::config::{SetsArgs, SetsFormat};
use crate::error::{IoResultExt, Result, SweepError};
use std::fmt::Write as _;
use std::path::Path;

/// Offset applied to a profile lying exactly on the mid-plane, which
/// coincides with mesh faces and interpolates badly
pub const MIDPLANE_NUDGE: f64 = 1e-5;

const SAMPLE_DICT_HEADER: &str = r"/*--------------------------------*- C++ -*----------------------------------*\
| =========                 |                                                 |
| \\      /  F ield         | OpenFOAM: The Open Source CFD Toolbox           |
|  \\    /   O peration     | Version:  2.4.x                                 |
|   \\  /    A nd           | Web:      www.OpenFOAM.org                      |
|    \\/     M anipulation  |                                                 |
\*---------------------------------------------------------------------------*/
FoamFile
{
    version     2.0;
    format      ascii;
    class       dictionary;
    object      sampleDict;
}
// * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * //
";

const FOOTER: &str =
    "// *********************************************************************** // \n";

/// Geometry and fields of a profile set
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSpec {
    /// Streamwise position
    pub x: f64,
    /// Lower cross-stream bound
    pub y_min: f64,
    /// Upper cross-stream bound
    pub y_max: f64,
    /// Points per profile
    pub ny: usize,
    /// Lowest profile height as a fraction of the turbine height
    pub z_h_min: f64,
    /// Highest profile height as a fraction of the turbine height
    pub z_h_max: f64,
    /// Number of profiles
    pub nz: usize,
    /// Turbine height
    pub height: f64,
    /// Sampled fields
    pub fields: Vec<String>,
    /// Output file format
    pub set_format: String,
    /// Interpolation scheme
    pub interpolation: String,
}

impl Default for ProfileSpec {
    fn default() -> Self {
        Self {
            x: 1.0,
            y_min: -1.5,
            y_max: 1.5,
            ny: 51,
            z_h_min: -1.25,
            z_h_max: 1.25,
            nz: 19,
            height: 0.807,
            fields: vec!["UMean".into(), "UPrime2Mean".into(), "kMean".into()],
            set_format: "raw".into(),
            interpolation: "cellPoint".into(),
        }
    }
}

impl From<&SetsArgs> for ProfileSpec {
    fn from(args: &SetsArgs) -> Self {
        Self {
            x: args.x,
            y_min: args.y_min,
            y_max: args.y_max,
            ny: args.ny,
            z_h_min: args.z_h_min,
            z_h_max: args.z_h_max,
            nz: args.nz,
            height: args.height,
            fields: args.fields.clone(),
            ..Default::default()
        }
    }
}

impl ProfileSpec {
    /// Reject specs that would produce an unusable dictionary
    pub fn validate(&self) -> Result<()> {
        if self.nz == 0 || self.ny < 2 {
            return Err(SweepError::config(format!(
                "need at least one profile with two points (nz = {}, ny = {})",
                self.nz, self.ny
            )));
        }
        if self.y_max <= self.y_min || self.z_h_max < self.z_h_min {
            return Err(SweepError::config("profile bounds are reversed"));
        }
        if self.fields.is_empty() {
            return Err(SweepError::config("no fields to sample"));
        }
        Ok(())
    }

    /// Profile heights, evenly spaced with both ends included
    pub fn heights(&self) -> Vec<f64> {
        let (z_min, z_max) = (self.z_h_min * self.height, self.z_h_max * self.height);
        let n = self.nz;
        (0..n)
            .map(|i| {
                let z = if n == 1 {
                    z_min
                } else if i == n - 1 {
                    z_max
                } else {
                    z_min + i as f64 * (z_max - z_min) / (n - 1) as f64
                };
                if z.abs() < 1e-12 {
                    MIDPLANE_NUDGE
                } else {
                    z
                }
            })
            .collect()
    }

    /// Dictionary text in the requested flavour
    pub fn render(&self, format: SetsFormat) -> String {
        let mut txt = String::new();
        match format {
            SetsFormat::Sets => {
                txt.push_str("\ntype sets;\n");
                txt.push_str("libs (\"libsampling.so\");\n");
                let _ = writeln!(txt, "setFormat {};", self.set_format);
                let _ = writeln!(txt, "interpolationScheme {};\n", self.interpolation);
            }
            SetsFormat::SampleDict => {
                txt.push_str(SAMPLE_DICT_HEADER);
                txt.push('\n');
                let _ = writeln!(txt, "setFormat {}; \n", self.set_format);
                let _ = writeln!(txt, "interpolationScheme {}; \n", self.interpolation);
            }
        }

        txt.push_str("sets \n ( \n");
        for z in self.heights() {
            let z = float_text(z);
            let _ = writeln!(txt, "    profile_{}", z);
            txt.push_str("    { \n");
            txt.push_str("        type        uniform; \n");
            txt.push_str("        axis        y; \n");
            let (x, y_min, y_max) = (float_text(self.x), float_text(self.y_min), float_text(self.y_max));
            let _ = writeln!(txt, "        start       ({} {} {});", x, y_min, z);
            let _ = writeln!(txt, "        end         ({} {} {});", x, y_max, z);
            let _ = writeln!(txt, "        nPoints     {};\n    }}\n", self.ny);
        }
        txt.push_str(");\n\n");

        txt.push_str("fields \n(\n");
        for field in &self.fields {
            let _ = writeln!(txt, "    {}", field);
        }
        txt.push_str("); \n\n");
        txt.push_str(FOOTER);
        txt
    }

    /// Render and write to `path`, creating parent directories
    pub fn write(&self, format: SetsFormat, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_path(parent)?;
        }
        std::fs::write(path, self.render(format)).with_path(path)?;
        tracing::info!("Wrote {} profiles to {:?}", self.nz, path);
        Ok(())
    }
}

/// Shortest float text with a signed two-digit exponent (`1e-05`), the
/// form profile names are matched against downstream
fn float_text(x: f64) -> String {
    let repr = format!("{:?}", x);
    match repr.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::read_value_str;

    #[test]
    fn test_heights_span_and_midplane() {
        let spec = ProfileSpec::default();
        let z = spec.heights();
        assert_eq!(z.len(), 19);
        assert!((z[0] + 1.25 * 0.807).abs() < 1e-12);
        assert_eq!(z[18], 1.25 * 0.807);
        // Middle profile nudged off the mid-plane
        assert_eq!(z[9], MIDPLANE_NUDGE);
    }

    #[test]
    fn test_single_profile() {
        let spec = ProfileSpec {
            nz: 1,
            z_h_min: 0.5,
            z_h_max: 0.5,
            height: 2.0,
            ..Default::default()
        };
        assert_eq!(spec.heights(), vec![1.0]);
    }

    #[test]
    fn test_sets_render() {
        let spec = ProfileSpec {
            nz: 3,
            ..Default::default()
        };
        let txt = spec.render(SetsFormat::Sets);

        assert!(txt.starts_with("\ntype sets;\nlibs (\"libsampling.so\");\n"));
        assert_eq!(read_value_str(&txt, "setFormat").as_deref(), Some("raw"));
        assert_eq!(txt.matches("type        uniform;").count(), 3);
        assert!(txt.contains("    profile_1e-05\n"));
        assert!(txt.contains("        start       (1.0 -1.5 1e-05);\n"));
        assert!(txt.contains("        end         (1.0 1.5 1e-05);\n"));
        assert!(txt.contains("        nPoints     51;\n"));
        assert!(txt.contains("fields \n(\n    UMean\n    UPrime2Mean\n    kMean\n); \n"));
        assert!(txt.ends_with(FOOTER));
    }

    #[test]
    fn test_float_text() {
        assert_eq!(float_text(1e-5), "1e-05");
        assert_eq!(float_text(2.5e-7), "2.5e-07");
        assert_eq!(float_text(1e16), "1e+16");
        assert_eq!(float_text(-1.00875), "-1.00875");
        assert_eq!(float_text(1.0), "1.0");
        assert_eq!(float_text(0.0001), "0.0001");
    }

    #[test]
    fn test_sample_dict_header() {
        let txt = ProfileSpec::default().render(SetsFormat::SampleDict);
        assert!(txt.contains("object      sampleDict;"));
        assert!(txt.contains("interpolationScheme cellPoint; \n"));
        assert!(!txt.contains("libsampling"));
    }

    #[test]
    fn test_sets_command_writes_into_case() {
        use crate::config::{CliArgs, Commands, SweepConfig};
        use clap::Parser;

        let dir = tempfile::TempDir::new().unwrap();
        let case_dir = dir.path().to_str().unwrap();

        for (format, expected) in [("sets", "system/sets"), ("sample-dict", "system/sampleDict")] {
            let args = CliArgs::try_parse_from(["foamsweep", "-C", case_dir, "sets", "--format", format, "--nz", "3"])
                .unwrap();
            let config = SweepConfig::from_cli(&args).unwrap();
            let Some(Commands::Sets(sets)) = &args.command else {
                panic!("expected the sets subcommand");
            };

            let path = sets.output_path(&config);
            assert_eq!(path, dir.path().join(expected));
            ProfileSpec::from(sets).write(sets.format, &path).unwrap();

            let txt = std::fs::read_to_string(&path).unwrap();
            assert_eq!(txt.matches("type        uniform;").count(), 3);
            assert!(txt.contains("profile_1e-05"));
        }
    }

    #[test]
    fn test_write_validates() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("system/sets");

        let bad = ProfileSpec {
            ny: 1,
            ..Default::default()
        };
        assert!(bad.write(SetsFormat::Sets, &path).is_err());
        assert!(!path.exists());

        ProfileSpec::default().write(SetsFormat::Sets, &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("profile_"));
    }
}
