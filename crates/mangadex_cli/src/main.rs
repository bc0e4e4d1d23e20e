//! CLI probe for the resource pool.
//!
//! # Responsibility
//! - Ingest one saved API response into a fresh pool.
//! - Print the resolved objects and pool counters deterministically.
//!
//! Usage: `mangadex_cli <document.json> [kind]` (kind defaults to `manga`).
//! Set `MANGADEX_LOG_DIR` to an absolute path to enable file logging.

use log::info;
use mangadex_core::{
    core_version, default_log_level, init_logging, open_envelope, Envelope, PoolConfig,
    Resource, ResourceKind, ResourcePool,
};
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "MANGADEX_LOG_DIR";

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: mangadex_cli <document.json> [kind]");
        return ExitCode::from(2);
    };
    let kind_tag = args.next().unwrap_or_else(|| ResourceKind::Manga.as_str().to_string());
    let Some(kind) = ResourceKind::from_tag(&kind_tag) else {
        eprintln!("unknown resource kind `{kind_tag}`");
        return ExitCode::from(2);
    };

    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(&path, kind) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str, kind: ResourceKind) -> Result<(), String> {
    let bytes = std::fs::read(path).map_err(|err| format!("cannot read `{path}`: {err}"))?;
    let pool = ResourcePool::new(PoolConfig::default()).map_err(|err| err.to_string())?;
    info!("event=cli_ingest module=cli status=start kind={kind}");

    println!("mangadex_core version={}", core_version());
    match open_envelope(&bytes).map_err(|err| err.to_string())? {
        Envelope::Entity(data) => {
            let resource = pool
                .ingest_fragment(&data, kind)
                .map_err(|err| err.to_string())?;
            println!("{}", summary(&resource));
        }
        Envelope::Collection(page) => {
            let outcome = pool.ingest_page(&page, kind);
            println!(
                "page limit={} offset={} total={}",
                outcome.limit, outcome.offset, outcome.total
            );
            for resource in &outcome.resources {
                println!("{}", summary(resource));
            }
            for failure in &outcome.failures {
                println!("failed index={} error={}", failure.index, failure.error);
            }
        }
    }

    let stats = pool.stats();
    println!(
        "stats created={} merged={} live_hits={} cache_hits={} misses={} live={} owned={}",
        stats.created,
        stats.merged,
        stats.live_hits,
        stats.cache_hits,
        stats.misses,
        pool.len_live(),
        pool.len_owned()
    );
    Ok(())
}

fn summary(resource: &Resource) -> String {
    let label = match resource {
        Resource::Manga(manga) => manga.title().to_string(),
        Resource::Chapter(chapter) => format!(
            "ch.{} {}",
            chapter.chapter_number().unwrap_or_default(),
            chapter.title().unwrap_or_default()
        ),
        Resource::Author(author) => author.name().to_string(),
        Resource::Tag(tag) => tag.name().to_string(),
        Resource::User(user) => user.username().to_string(),
        Resource::CoverArt(cover) => cover.file_name().to_string(),
        Resource::ScanlationGroup(group) => group.name().to_string(),
        Resource::CustomList(list) => list.name().to_string(),
    };
    format!(
        "{resource} version={} edges={} label={label}",
        resource.version(),
        resource.relations().len()
    )
}
