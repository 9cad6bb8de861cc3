use std::{fs::File, io::BufReader, path::PathBuf, time::Instant};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use scf_core::{
    config::ConfigSystem,
    hf::{restricted_hartree_fock, HartreeFockInput, InitialGuess, RestrictedHartreeFockOutput},
};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Restricted hartree fock calculations, see data/h2_sto3g.json for an example input",
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    command: ScfCommand,
}

#[derive(Subcommand, Debug)]
enum ScfCommand {
    /// Runs a restricted hartree fock calculation
    #[command(name = "hf")]
    RestrictedHartreeFock {
        /// A json file with the molecule, its basis and optional SCF settings
        system: PathBuf,
        /// The maximum number of iterations the SCF loop should attempt before the
        /// system is considered to not converge
        #[arg(long)]
        max_iterations: Option<usize>,
        /// if the rms of the density matrix changes by less than this, the system is
        /// considered converged
        #[arg(long)]
        density_threshold: Option<f64>,
        /// How to build the fock matrix of the first iteration
        #[arg(long, value_enum)]
        guess: Option<Guess>,
        /// Plain fixed point iteration without DIIS
        #[arg(long)]
        no_diis: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Guess {
    Core,
    Huckel,
}

impl From<Guess> for InitialGuess {
    fn from(value: Guess) -> Self {
        match value {
            Guess::Core => InitialGuess::Core,
            Guess::Huckel => InitialGuess::extended_huckel(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args: Args = Args::parse();

    match args.command {
        ScfCommand::RestrictedHartreeFock {
            system,
            max_iterations,
            density_threshold,
            guess,
            no_diis,
        } => {
            let file = File::open(&system)
                .with_context(|| format!("failed to open {}", system.display()))?;
            let config: ConfigSystem = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to parse {}", system.display()))?;
            let (molecule, basis, mut scf) = config.into_parts()?;

            if let Some(max_iterations) = max_iterations {
                scf.max_iterations = max_iterations;
            }
            if let Some(density_threshold) = density_threshold {
                scf.density_threshold = density_threshold;
            }
            if let Some(guess) = guess {
                scf.initial_guess = guess.into();
            }
            if no_diis {
                scf.diis.enabled = false;
            }
            log::debug!("SCF settings: {scf:?}");

            let start = Instant::now();
            let hf_output = restricted_hartree_fock(&HartreeFockInput {
                molecule: &molecule,
                basis: &basis,
                config: &scf,
            });

            match hf_output {
                Ok(
                    ref output @ RestrictedHartreeFockOutput {
                        ref orbital_energies,
                        electronic_energy,
                        nuclear_repulsion,
                        iterations,
                        ..
                    },
                ) => {
                    println!(
                        "hartree fock converged after {iterations} iterations and {:0.2?}",
                        start.elapsed()
                    );
                    println!("electronic energy: {electronic_energy:3.8}");
                    println!("nuclear repulsion energy: {nuclear_repulsion:3.8}");
                    println!("hartree fock energy: {:3.8}", output.total_energy());
                    println!("orbital energies: {orbital_energies:3.4?}");
                }
                Err(error) if error.is_convergence_failure() => {
                    log::error!("{error}");
                    anyhow::bail!("hartree fock did not converge");
                }
                Err(error) => return Err(error).context("hartree fock failed"),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const H2_STO3G: &str = include_str!("../data/h2_sto3g.json");

    #[test]
    fn arguments_override_the_file() {
        let args = Args::try_parse_from([
            "scf-cli",
            "hf",
            "data/h2_sto3g.json",
            "--max-iterations",
            "7",
            "--guess",
            "huckel",
            "--no-diis",
        ])
        .unwrap();

        let ScfCommand::RestrictedHartreeFock {
            system,
            max_iterations,
            density_threshold,
            guess,
            no_diis,
        } = args.command;
        assert_eq!(system, PathBuf::from("data/h2_sto3g.json"));
        assert_eq!(max_iterations, Some(7));
        assert_eq!(density_threshold, None);
        assert!(matches!(guess, Some(Guess::Huckel)));
        assert!(no_diis);
    }

    #[test]
    fn sample_input_converges() {
        let config: ConfigSystem = serde_json::from_str(H2_STO3G).unwrap();
        let (molecule, basis, scf) = config.into_parts().unwrap();
        assert_eq!(basis.len(), 2);

        let output = restricted_hartree_fock(&HartreeFockInput {
            molecule: &molecule,
            basis: &basis,
            config: &scf,
        })
        .unwrap();

        assert!((output.total_energy() - -1.11676).abs() < 1e-4);
        assert!((output.nuclear_repulsion - 1.0 / 1.4).abs() < 1e-12);
    }
}
