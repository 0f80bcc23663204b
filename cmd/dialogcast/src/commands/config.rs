//! Configuration management commands.

use clap::{Args, Subcommand};

use dialogcast_cli::config::Profile;

use super::{get_config, neural_fallback_notice, output_result, print_success, print_warning};
use crate::Cli;

/// Manage CLI configuration.
///
/// Profiles bundle synthesis settings (backend, model, sample rate, seed,
/// silence pad, workers), similar to kubectl's context management.
///
/// Configuration is stored in ~/.dialogcast/config.yaml
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Create the config file if it does not exist
    Init,
    /// Add or replace a profile
    #[command(name = "add-profile")]
    AddProfile {
        /// Profile name
        name: String,
        /// Synthesis backend: neural, procedural or silent
        #[arg(long)]
        backend: Option<String>,
        /// Neural model file
        #[arg(long)]
        model_path: Option<String>,
        /// Speaker embeddings JSON file
        #[arg(long)]
        embeddings_path: Option<String>,
        /// Procedural sample rate in Hz
        #[arg(long)]
        sample_rate: Option<u32>,
        /// Silence between clips, in seconds
        #[arg(long)]
        silence_pad: Option<f64>,
        /// Noise seed
        #[arg(long)]
        seed: Option<u64>,
        /// Per-utterance encoding: pcm16 or float32
        #[arg(long)]
        encoding: Option<String>,
        /// Synthesis threads
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Delete a profile
    #[command(name = "delete-profile")]
    DeleteProfile {
        /// Profile name
        name: String,
    },
    /// Set the current profile
    #[command(name = "use-profile")]
    UseProfile {
        /// Profile name
        name: String,
    },
    /// List all profiles
    #[command(name = "list-profiles", alias = "get-profiles")]
    ListProfiles,
    /// View the current configuration
    View,
}

impl ConfigCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::Init => {
                let cfg = get_config(cli)?;
                print_success(&format!("Config file: {}", cfg.path().display()));
                Ok(())
            }

            ConfigSubcommand::AddProfile {
                name,
                backend,
                model_path,
                embeddings_path,
                sample_rate,
                silence_pad,
                seed,
                encoding,
                workers,
            } => {
                let mut cfg = get_config(cli)?;

                let profile = Profile {
                    backend: backend.clone().unwrap_or_default(),
                    model_path: model_path.clone().unwrap_or_default(),
                    embeddings_path: embeddings_path.clone().unwrap_or_default(),
                    sample_rate: sample_rate.unwrap_or(0),
                    silence_pad: *silence_pad,
                    seed: seed.unwrap_or(0),
                    encoding: encoding.clone().unwrap_or_default(),
                    workers: workers.unwrap_or(0),
                    ..Default::default()
                };

                let notice = neural_fallback_notice(&profile.backend);
                cfg.add_profile(name, profile)?;
                print_success(&format!("Profile \"{}\" added successfully", name));
                if let Some(notice) = notice {
                    print_warning(&notice);
                }
                Ok(())
            }

            ConfigSubcommand::DeleteProfile { name } => {
                let mut cfg = get_config(cli)?;
                cfg.delete_profile(name)?;
                print_success(&format!("Profile \"{}\" deleted", name));
                Ok(())
            }

            ConfigSubcommand::UseProfile { name } => {
                let mut cfg = get_config(cli)?;
                cfg.use_profile(name)?;
                print_success(&format!("Switched to profile \"{}\"", name));
                Ok(())
            }

            ConfigSubcommand::ListProfiles => {
                let cfg = get_config(cli)?;

                if cfg.profiles.is_empty() {
                    println!("No profiles configured");
                    return Ok(());
                }

                // Print table header
                println!("{:<8} {:<20} {:<12} {}", "CURRENT", "NAME", "BACKEND", "MODEL");

                for name in cfg.list_profiles() {
                    let Some(profile) = cfg.profiles.get(name) else {
                        continue;
                    };
                    let current = if name == cfg.current_profile { "*" } else { "" };
                    let backend = if profile.backend.is_empty() {
                        "(default)"
                    } else {
                        &profile.backend
                    };
                    println!("{:<8} {:<20} {:<12} {}", current, name, backend, profile.model_path);
                }

                Ok(())
            }

            ConfigSubcommand::View => {
                let cfg = get_config(cli)?;

                if cli.json {
                    return output_result(&cfg, cli);
                }

                println!("Config file: {}", cfg.path().display());
                println!("Current profile: {}", cfg.current_profile);
                println!("Profiles: {}", cfg.profiles.len());

                if !cfg.profiles.is_empty() {
                    println!("\nProfile details:");

                    for name in cfg.list_profiles() {
                        let Some(p) = cfg.profiles.get(name) else {
                            continue;
                        };
                        println!("\n  {}:", name);
                        if !p.backend.is_empty() {
                            println!("    Backend: {}", p.backend);
                        }
                        if !p.model_path.is_empty() {
                            println!("    Model: {}", p.model_path);
                        }
                        if !p.embeddings_path.is_empty() {
                            println!("    Embeddings: {}", p.embeddings_path);
                        }
                        if p.sample_rate > 0 {
                            println!("    Sample rate: {} Hz", p.sample_rate);
                        }
                        if let Some(pad) = p.silence_pad {
                            println!("    Silence pad: {}s", pad);
                        }
                        if p.seed != 0 {
                            println!("    Seed: {}", p.seed);
                        }
                        if !p.encoding.is_empty() {
                            println!("    Encoding: {}", p.encoding);
                        }
                        if p.workers > 0 {
                            println!("    Workers: {}", p.workers);
                        }
                    }
                }

                Ok(())
            }
        }
    }
}
