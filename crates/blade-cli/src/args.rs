//! Command line definition

use std::path::PathBuf;

use blade_core::{Sizing, TurbineInputs};
use clap::{Parser, Subcommand};

/// Wind turbine blade designer and generator
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "turbine-blade", version, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Compute a design and write a project file
    Init(InitArgs),
    /// Print the design summary and station table of a project
    Design {
        /// Project file (.ron)
        project: PathBuf,
    },
    /// Generate the blade of a project and write its exports
    Build(BuildArgs),
}

#[derive(Debug, Clone, PartialEq, clap::Args)]
pub struct InitArgs {
    /// Project file to create (.ron)
    pub project: PathBuf,

    /// Project name [default: file stem]
    #[arg(long)]
    pub name: Option<String>,

    /// Rotor diameter in meters [default: 3]
    #[arg(long, conflicts_with_all = ["power", "rpm"])]
    pub diameter: Option<f64>,

    /// Generator power in watts, sizes the rotor together with --rpm
    #[arg(long, requires = "rpm")]
    pub power: Option<f64>,

    /// Generator speed at rated power
    #[arg(long, requires = "power")]
    pub rpm: Option<f64>,

    /// Generator revolutions per rotor revolution [default: 1]
    #[arg(long = "gear", requires = "power")]
    pub gear_ratio: Option<f64>,

    /// Tip speed ratio [default: 6]
    #[arg(long = "tsr")]
    pub tip_speed_ratio: Option<f64>,

    /// Number of blades [default: 3]
    #[arg(long = "blades")]
    pub number_of_blades: Option<u32>,

    /// Number of stations [default: 10]
    #[arg(long = "stations")]
    pub number_of_stations: Option<u32>,

    /// Replace an existing project file
    #[arg(long)]
    pub overwrite: bool,
}

impl InitArgs {
    /// Design inputs, with defaults for everything not given
    pub fn inputs(&self) -> TurbineInputs {
        let defaults = TurbineInputs::default();
        let sizing = match (self.diameter, self.power, self.rpm) {
            (Some(diameter), _, _) => Sizing::Diameter(diameter),
            (None, Some(power), Some(rpm)) => Sizing::Generator {
                power,
                rpm,
                gear_ratio: self.gear_ratio.unwrap_or(1.0),
            },
            _ => defaults.sizing,
        };
        TurbineInputs {
            tip_speed_ratio: self.tip_speed_ratio.unwrap_or(defaults.tip_speed_ratio),
            number_of_blades: self.number_of_blades.unwrap_or(defaults.number_of_blades),
            sizing,
            number_of_stations: self
                .number_of_stations
                .unwrap_or(defaults.number_of_stations),
        }
    }
}

#[derive(Debug, Clone, PartialEq, clap::Args)]
pub struct BuildArgs {
    /// Project file (.ron)
    pub project: PathBuf,

    /// Output directory [default: project directory]
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Skip the STL mesh
    #[arg(long)]
    pub no_stl: bool,

    /// Skip the FreeCAD macro
    #[arg(long)]
    pub no_macro: bool,

    /// Skip the OpenSCAD source
    #[arg(long)]
    pub no_scad: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("turbine-blade").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    fn parse_init(args: &[&str]) -> InitArgs {
        match parse(args).unwrap() {
            Command::Init(init) => init,
            other => panic!("expected init, got {other:?}"),
        }
    }

    #[test]
    fn test_no_args_shows_help() {
        let err = parse(&[]).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
        assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_init_with_generator() {
        let init = parse_init(&[
            "init", "rotor.ron", "--power", "500", "--rpm", "400", "--gear", "2", "--tsr", "7",
            "--blades", "2", "--stations", "6",
        ]);

        assert_eq!(init.project, PathBuf::from("rotor.ron"));
        assert_eq!(
            init.inputs(),
            TurbineInputs {
                tip_speed_ratio: 7.0,
                number_of_blades: 2,
                sizing: Sizing::Generator {
                    power: 500.0,
                    rpm: 400.0,
                    gear_ratio: 2.0,
                },
                number_of_stations: 6,
            }
        );
        assert!(!init.overwrite);
    }

    #[test]
    fn test_init_defaults() {
        let init = parse_init(&["init", "rotor.ron", "--diameter", "2.4"]);
        let inputs = init.inputs();
        assert_eq!(inputs.sizing, Sizing::Diameter(2.4));
        assert_eq!(inputs.number_of_stations, 10);
        assert_eq!(init.name, None);

        let init = parse_init(&["init", "rotor.ron", "--power", "500", "--rpm", "400"]);
        assert_eq!(
            init.inputs().sizing,
            Sizing::Generator {
                power: 500.0,
                rpm: 400.0,
                gear_ratio: 1.0,
            }
        );

        let init = parse_init(&["init", "rotor.ron"]);
        assert_eq!(init.inputs(), TurbineInputs::default());
    }

    #[test]
    fn test_init_sizing_conflicts() {
        let err = parse(&["init", "r.ron", "--diameter", "2", "--power", "500", "--rpm", "400"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);

        let err = parse(&["init", "r.ron", "--power", "500"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = parse(&["init", "r.ron", "--gear", "2"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_bad_values() {
        assert_eq!(
            parse(&["init", "r.ron", "--tsr", "fast"]).unwrap_err().kind(),
            ErrorKind::ValueValidation
        );
        assert!(parse(&["init", "r.ron", "--blades"]).is_err());
        assert!(parse(&["init"]).is_err());
        assert!(parse(&["spin"]).is_err());
    }

    #[test]
    fn test_build_flags() {
        let command = parse(&["build", "rotor.ron", "--out-dir", "out", "--no-scad"]).unwrap();
        assert_eq!(
            command,
            Command::Build(BuildArgs {
                project: PathBuf::from("rotor.ron"),
                out_dir: Some(PathBuf::from("out")),
                no_stl: false,
                no_macro: false,
                no_scad: true,
            })
        );
    }

    #[test]
    fn test_design_command() {
        assert_eq!(
            parse(&["design", "rotor.ron"]).unwrap(),
            Command::Design {
                project: PathBuf::from("rotor.ron")
            }
        );
        assert_eq!(
            parse(&["design", "rotor.ron", "--bogus"]).unwrap_err().kind(),
            ErrorKind::UnknownArgument
        );
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
