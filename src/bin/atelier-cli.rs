#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use atelier::{
    config::{self, format_minute_of_day},
    io,
    layout::{day_span, week_of, EngineConfig, LayoutEngine},
    model::ResourceId,
    time,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de mise en page du planning atelier (technicien × jour)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de configuration (fenêtre, fuseau, échelle)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculer la vue pour un jour, une plage ou une semaine
    Layout {
        /// CSV `id,resource,start,end[,status]`
        #[arg(long)]
        appointments: String,
        /// Jour unique (YYYY-MM-DD)
        #[arg(long)]
        day: Option<NaiveDate>,
        /// Début de plage (inclus)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,
        /// Fin de plage (incluse)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
        /// Semaine ISO contenant ce jour
        #[arg(long)]
        week: Option<NaiveDate>,
        /// liste "tech1,tech2,..." affichée même sans rendez-vous
        #[arg(long)]
        resources: Option<String>,
        /// Force l'affichage des lignes vides
        #[arg(long)]
        include_empty: bool,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Vérifier les rendez-vous (intervalles invalides, ids dupliqués)
    Validate {
        #[arg(long)]
        appointments: String,
    },

    /// Afficher l'heure murale d'un instant
    Normalize {
        /// RFC3339
        #[arg(long)]
        at: String,
        /// Fuseau IANA (défaut : celui de la configuration)
        #[arg(long)]
        tz: Option<String>,
    },

    /// Écrire la configuration par défaut
    InitConfig {
        #[arg(long, default_value = "atelier.json")]
        out: String,
    },

    /// Plage UTC à récupérer pour couvrir les jours donnés
    Range {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let mut engine_config = match &cli.config {
        Some(path) => config::load_config_from_file(path)?,
        None => EngineConfig::default(),
    };

    let code = match cli.cmd {
        Commands::Layout {
            appointments,
            day,
            from,
            to,
            week,
            resources,
            include_empty,
            out_json,
            out_csv,
        } => {
            let days = match (day, from, to, week) {
                (_, _, _, Some(anchor)) => week_of(anchor),
                (_, Some(from), Some(to), _) => day_span(from, to)?,
                (Some(day), _, _, _) => vec![day],
                _ => bail!("one of --day, --from/--to or --week is required"),
            };
            let roster: Vec<ResourceId> = resources
                .as_deref()
                .unwrap_or("")
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ResourceId::new)
                .collect();
            if include_empty {
                engine_config.include_empty_resource_rows = true;
            }

            let engine = LayoutEngine::new(engine_config)?;
            let list = io::import_appointments_csv(&appointments)?;
            let view = engine
                .build_view(&list, &days, &roster)
                .with_context(|| format!("laying out {appointments}"))?;

            if let Some(path) = out_json {
                io::export_view_json(path, &view)?;
            }
            if let Some(path) = out_csv {
                io::export_blocks_csv(path, &view)?;
            }

            // impression compacte, en heure murale (jours de changement d'heure compris)
            let window = *engine.window();
            let label = |day: NaiveDate, offset: u32| {
                let Some(opening) = time::local_instant(day, window.open_minute, &window.time_zone)
                else {
                    return "??:??".to_string();
                };
                let wall = time::normalize(
                    opening + Duration::minutes(i64::from(offset)),
                    &window.time_zone,
                );
                let minute = if wall.date > day {
                    wall.minute_of_day + 24 * 60
                } else {
                    wall.minute_of_day
                };
                format_minute_of_day(minute)
            };
            for (resource, row) in view.rows() {
                for (day, blocks) in row {
                    if blocks.is_empty() {
                        println!("{resource} | {day} | (vide)");
                    }
                    for b in blocks {
                        println!(
                            "{} | {} | {} | {} → {} | lane {}/{} | {}",
                            resource,
                            day,
                            b.appointment_id,
                            label(*day, b.start_offset_minutes),
                            label(*day, b.start_offset_minutes + b.duration_minutes),
                            b.lane_index,
                            b.lane_count,
                            b.payload
                        );
                    }
                }
            }
            0
        }
        Commands::Validate { appointments } => {
            let engine = LayoutEngine::new(engine_config)?;
            let list = io::import_appointments_csv(&appointments)?;
            let errors = engine.validate_all(&list);
            if errors.is_empty() {
                println!("OK: {} appointment(s)", list.len());
                0
            } else {
                eprintln!("Found {} invalid appointment(s)", errors.len());
                for err in &errors {
                    eprintln!("  {err}");
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Normalize { at, tz } => {
            let instant: DateTime<Utc> = at.parse().context("--at RFC3339")?;
            let zone = time::resolve_time_zone(tz.as_deref().unwrap_or(&engine_config.time_zone))?;
            let wall = time::normalize(instant, &zone);
            println!(
                "{} {} ({})",
                wall.date,
                format_minute_of_day(wall.minute_of_day),
                zone.name()
            );
            0
        }
        Commands::InitConfig { out } => {
            config::export_config_json(&out, &engine_config)?;
            println!("Config written to {out}");
            0
        }
        Commands::Range { from, to } => {
            let engine = LayoutEngine::new(engine_config)?;
            let days = day_span(from, to)?;
            let Some((start, end)) = engine.query_range(&days) else {
                bail!("cannot resolve local midnight for {from} .. {to}");
            };
            println!("{} {}", start.to_rfc3339(), end.to_rfc3339());
            0
        }
    };

    std::process::exit(code);
}
