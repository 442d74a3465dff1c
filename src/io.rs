use crate::ledger::{Ledger, ServiceEvent};
use crate::model::{Header, Party, Requester, Scope, Staff, REDIRECTED};
use crate::roster::{RequestQueue, Roster};
use crate::scheduler::{Plan, SchedError};
use crate::time::Duration;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Un fichier instantané prêt à écrire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub file_name: String,
    pub contents: String,
}

/// Effectif : en-tête `Doctors` puis `name, category, availability, minutes_today, weekly`.
pub fn parse_roster(text: &str) -> anyhow::Result<Roster> {
    read_roster(text, "<input>")
}

/// File de demandes : en-tête `Mothers` puis `name, age, band, urgency`.
pub fn parse_queue(text: &str) -> anyhow::Result<RequestQueue> {
    read_queue(text, "<input>")
}

/// Planning : en-tête `Schedule` puis `time, requester, staff|redirected to other network`.
pub fn parse_ledger(text: &str) -> anyhow::Result<Ledger> {
    read_ledger(text, "<input>")
}

pub fn load_roster<P: AsRef<Path>>(path: P) -> anyhow::Result<Roster> {
    let (text, origin) = read_file(path.as_ref())?;
    read_roster(&text, &origin)
}

pub fn load_queue<P: AsRef<Path>>(path: P) -> anyhow::Result<RequestQueue> {
    let (text, origin) = read_file(path.as_ref())?;
    read_queue(&text, &origin)
}

pub fn load_ledger<P: AsRef<Path>>(path: P) -> anyhow::Result<Ledger> {
    let (text, origin) = read_file(path.as_ref())?;
    read_ledger(&text, &origin)
}

fn read_file(path: &Path) -> anyhow::Result<(String, String)> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok((text, path.display().to_string()))
}

fn read_roster(text: &str, origin: &str) -> anyhow::Result<Roster> {
    let (header, body) = split_snapshot(text, Scope::Staff, origin)?;
    let mut staff = Vec::new();
    for rec in records(&body, 5, origin)? {
        let line = line_of(&rec);
        let member = Staff::new(
            &rec[0],
            rec[1].parse().with_context(|| format!("{origin}:{line}: category"))?,
            rec[2].parse().with_context(|| format!("{origin}:{line}: availability"))?,
            rec[3].parse().with_context(|| format!("{origin}:{line}: minutes today"))?,
            rec[4].parse::<Duration>().with_context(|| format!("{origin}:{line}: weekly time"))?,
        );
        staff.push(member);
    }
    Ok(Roster::new(header, staff))
}

fn read_queue(text: &str, origin: &str) -> anyhow::Result<RequestQueue> {
    let (header, body) = split_snapshot(text, Scope::Requests, origin)?;
    let mut requesters = Vec::new();
    for rec in records(&body, 4, origin)? {
        let line = line_of(&rec);
        requesters.push(Requester::new(
            &rec[0],
            rec[1].parse().with_context(|| format!("{origin}:{line}: age"))?,
            rec[2].parse().with_context(|| format!("{origin}:{line}: band"))?,
            rec[3].parse().with_context(|| format!("{origin}:{line}: urgency"))?,
        ));
    }
    Ok(RequestQueue::new(header, requesters))
}

fn read_ledger(text: &str, origin: &str) -> anyhow::Result<Ledger> {
    let (header, body) = split_snapshot(text, Scope::Schedule, origin)?;
    let mut events = Vec::new();
    for rec in records(&body, 3, origin)? {
        let line = line_of(&rec);
        let time: Duration = rec[0].parse().with_context(|| format!("{origin}:{line}: time"))?;
        let requester = Party::placeholder(&rec[1]);
        let event = if &rec[2] == REDIRECTED {
            ServiceEvent::redirected(time, requester)
        } else {
            ServiceEvent::assigned(time, requester, Party::placeholder(&rec[2]))
        };
        events.push(event);
    }
    Ok(Ledger::new(header, events))
}

/// Sépare l'en-tête (7 lignes) du corps et vérifie la portée attendue.
fn split_snapshot(text: &str, expected: Scope, origin: &str) -> anyhow::Result<(Header, String)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().map(str::trim_end);
    let mut field = |label: &str| -> anyhow::Result<String> {
        match lines.next() {
            Some(l) if l == label => {}
            other => bail!("{origin}: expected `{label}` header line, found {other:?}"),
        }
        lines
            .next()
            .map(|v| v.trim().to_string())
            .with_context(|| format!("{origin}: missing value after `{label}`"))
    };

    let organization = field("Organization:")?;
    let time: Duration = field("Time:")?
        .parse()
        .with_context(|| format!("{origin}: header time"))?;
    let raw_date = field("Date:")?;
    let date = NaiveDate::parse_from_str(&raw_date, Header::DATE_FORMAT)
        .with_context(|| format!("{origin}: invalid header date `{raw_date}`"))?;

    let scope_line = lines
        .next()
        .with_context(|| format!("{origin}: missing scope line"))?;
    let tag = scope_line
        .strip_suffix(':')
        .with_context(|| format!("{origin}: scope line must end with `:`"))?;
    let found: Scope = tag.trim().parse().with_context(|| format!("{origin}: header scope"))?;
    if found != expected {
        return Err(SchedError::ScopeMismatch {
            file: origin.to_string(),
            expected,
            found,
        }
        .into());
    }

    let body: Vec<&str> = lines.collect();
    Ok((Header::new(organization, time, date, found), body.join("\n")))
}

fn records(body: &str, width: usize, origin: &str) -> anyhow::Result<Vec<StringRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(body.as_bytes());
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec.with_context(|| format!("{origin}: unreadable record"))?;
        if rec.iter().all(str::is_empty) {
            continue;
        }
        if rec.len() != width {
            bail!(
                "{origin}:{}: expected {width} fields, found {}",
                line_of(&rec),
                rec.len()
            );
        }
        if rec[0].is_empty() {
            bail!("{origin}:{}: empty name", line_of(&rec));
        }
        out.push(rec);
    }
    Ok(out)
}

/// Numéro de ligne dans le fichier complet (en-tête de 7 lignes inclus).
fn line_of(rec: &StringRecord) -> u64 {
    rec.position().map_or(0, |p| p.line() + 7)
}

fn render<T: std::fmt::Display>(header: &Header, rows: impl Iterator<Item = T>) -> String {
    let mut out = header.to_string();
    out.push('\n');
    for row in rows {
        // l'écriture dans une String ne peut pas échouer
        let _ = writeln!(out, "{row}");
    }
    out
}

pub fn render_roster(roster: &Roster) -> String {
    render(roster.header(), roster.staff().iter())
}

pub fn render_queue(queue: &RequestQueue) -> String {
    render(queue.header(), queue.requesters().iter())
}

pub fn render_ledger(ledger: &Ledger) -> String {
    render(ledger.header(), ledger.events().iter())
}

/// Les deux fichiers de sortie d'une période (planning puis effectif).
pub fn plan_snapshots(plan: &Plan) -> Vec<Snapshot> {
    vec![
        Snapshot {
            file_name: format!("{}.txt", plan.ledger.header().file_stem()),
            contents: render_ledger(&plan.ledger),
        },
        Snapshot {
            file_name: format!("{}.txt", plan.roster.header().file_stem()),
            contents: render_roster(&plan.roster),
        },
    ]
}
