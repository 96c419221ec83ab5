use crate::layout::{LaidOutBlock, View};
use crate::model::{Appointment, AppointmentId, ResourceId, ResourceKey};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Import de rendez-vous: header `id,resource,start,end[,status]` (RFC3339).
///
/// `id` vide → UUID aléatoire ; `resource` vide → non assigné. Le statut
/// devient le payload. Aucune validation d'intervalle ici : c'est le moteur
/// qui rejette.
pub fn import_appointments_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Appointment<String>>> {
    let path = path.as_ref();
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    read_appointments(rdr)
}

pub fn read_appointments<R: std::io::Read>(
    mut rdr: csv::Reader<R>,
) -> Result<Vec<Appointment<String>>> {
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let row = line + 2;
        let id = rec.get(0).context("missing id")?.trim();
        let resource = rec.get(1).context("missing resource")?.trim();
        let start = rec.get(2).context("missing start")?.trim();
        let end = rec.get(3).context("missing end")?.trim();
        let status = rec.get(4).unwrap_or("").trim();

        let start: DateTime<Utc> = start
            .parse()
            .with_context(|| format!("row {row}: start RFC3339"))?;
        let end: DateTime<Utc> = end
            .parse()
            .with_context(|| format!("row {row}: end RFC3339"))?;

        out.push(Appointment {
            id: if id.is_empty() {
                AppointmentId::random()
            } else {
                AppointmentId::new(id)
            },
            start,
            end,
            resource: (!resource.is_empty()).then(|| ResourceId::new(resource)),
            payload: status.to_string(),
        });
    }
    Ok(out)
}

/// Export CSV des blocs:
/// header `resource,day,appointment_id,start_offset_minutes,duration_minutes,lane_index,lane_count,status`
pub fn write_blocks_csv<W: Write, P: AsRef<str>>(writer: W, view: &View<'_, P>) -> Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(writer);
    w.write_record([
        "resource",
        "day",
        "appointment_id",
        "start_offset_minutes",
        "duration_minutes",
        "lane_index",
        "lane_count",
        "status",
    ])?;
    let mut offset = itoa::Buffer::new();
    let mut duration = itoa::Buffer::new();
    let mut lane = itoa::Buffer::new();
    let mut lanes = itoa::Buffer::new();
    for (key, block) in view.blocks() {
        let resource = match key {
            ResourceKey::Assigned(id) => id.as_str(),
            ResourceKey::Unassigned => "",
        };
        let day = block.day.to_string();
        w.write_record([
            resource,
            day.as_str(),
            block.appointment_id.as_str(),
            offset.format(block.start_offset_minutes),
            duration.format(block.duration_minutes),
            lane.format(block.lane_index),
            lanes.format(block.lane_count),
            block.payload.as_ref(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

pub fn export_blocks_csv<Q: AsRef<Path>, P: AsRef<str>>(path: Q, view: &View<'_, P>) -> Result<()> {
    let path = path.as_ref();
    let file =
        fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_blocks_csv(file, view)
}

#[derive(Serialize)]
struct RowRecord<'v, 'a, P> {
    resource: Option<&'v ResourceId>,
    days: &'v BTreeMap<NaiveDate, Vec<LaidOutBlock<'a, P>>>,
}

/// Export JSON de la vue (jolie mise en forme), écrit de manière atomique.
pub fn export_view_json<Q: AsRef<Path>, P: Serialize>(path: Q, view: &View<'_, P>) -> Result<()> {
    let rows: Vec<RowRecord<'_, '_, P>> = view
        .rows()
        .map(|(key, days)| RowRecord {
            resource: match key {
                ResourceKey::Assigned(id) => Some(id),
                ResourceKey::Unassigned => None,
            },
            days,
        })
        .collect();
    let json = serde_json::to_vec_pretty(&rows)?;

    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).with_context(|| "atomic rename")?;
    Ok(())
}
