//! HTML digest rendering.
//!
//! All text that originates outside the crate (symbols, reasons, company
//! names, headlines, links) is escaped before it is written into markup.

use crate::jobs::types::{DigestSections, MarketPulseRow, ResearchEntry, SignalRow};
use crate::services::news::Headline;
use chrono::DateTime;
use chrono_tz::Tz;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::{Deserialize, Serialize};

pub const DIGEST_NAME: &str = "Stockshark Digest";

const TH_STYLE: &str =
    "text-align:left;padding:8px;border-bottom:1px solid #333;white-space:nowrap";
const TD_STYLE: &str = "padding:8px;border-bottom:1px solid #222;vertical-align:top";
const H3_STYLE: &str = "margin-top:18px";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

/// "Stockshark Digest — Mon Mar 04, 2024 07:30 AM (America/New_York)"
pub fn digest_title(now: &DateTime<Tz>) -> String {
    format!(
        "{} — {} ({})",
        DIGEST_NAME,
        now.format("%a %b %d, %Y %I:%M %p"),
        now.timezone().name()
    )
}

/// "Stockshark Digest — Mon Mar 04"
pub fn digest_subject(now: &DateTime<Tz>) -> String {
    format!("{} — {}", DIGEST_NAME, now.format("%a %b %d"))
}

fn empty_note(text: &str) -> String {
    format!("<p><em>{}</em></p>", text)
}

/// Table with a header row; an empty body renders "No data".
fn table(header: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return empty_note("No data");
    }

    let th: String = header
        .iter()
        .map(|h| format!("<th style='{}'>{}</th>", TH_STYLE, encode_text(h)))
        .collect();
    let body: String = rows
        .iter()
        .map(|row| {
            let tds: String = row
                .iter()
                .map(|cell| format!("<td style='{}'>{}</td>", TD_STYLE, encode_text(cell)))
                .collect();
            format!("<tr>{}</tr>", tds)
        })
        .collect();

    format!(
        "<table style=\"border-collapse:collapse;width:100%;font-family:Arial,sans-serif;font-size:14px\">\
         <thead><tr>{}</tr></thead><tbody>{}</tbody></table>",
        th, body
    )
}

fn market_pulse_table(rows: &[MarketPulseRow]) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|r| vec![r.symbol.clone(), r.last.clone(), r.chg.clone(), r.note.clone()])
        .collect();
    table(&["Symbol", "Last", "1D %", "Notes"], &rows)
}

fn signal_table(rows: &[SignalRow]) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.symbol.clone(),
                r.close.clone(),
                r.risk_label().to_string(),
                r.reason.clone(),
            ]
        })
        .collect();
    table(&["Symbol", "Close", "Risk", "Summary"], &rows)
}

fn top_focus_list(rows: &[SignalRow]) -> String {
    if rows.is_empty() {
        return empty_note("No high-priority alerts today.");
    }
    let items: String = rows
        .iter()
        .map(|r| {
            format!(
                "<li><strong>{}</strong> — <strong>{}</strong> — {}</li>",
                encode_text(&r.symbol),
                r.risk_label(),
                encode_text(&r.reason)
            )
        })
        .collect();
    format!("<ul>{}</ul>", items)
}

fn triggered_list(rows: &[SignalRow]) -> String {
    if rows.is_empty() {
        return empty_note("No alerts triggered.");
    }
    let items: String = rows
        .iter()
        .map(|r| {
            format!(
                "<li><strong>{}</strong>: {} — {}</li>",
                encode_text(&r.symbol),
                r.risk_label(),
                encode_text(&r.reason)
            )
        })
        .collect();
    format!("<ul>{}</ul>", items)
}

fn anchor(url: &str, text: &str) -> String {
    format!(
        "<a href=\"{}\">{}</a>",
        encode_double_quoted_attribute(url),
        encode_text(text)
    )
}

fn headline_list(label: &str, headlines: &[Headline]) -> String {
    if headlines.is_empty() {
        return String::new();
    }
    let items: String = headlines
        .iter()
        .map(|h| {
            let source = if h.source.is_empty() {
                String::new()
            } else {
                format!(" <span style=\"color:#888\">({})</span>", encode_text(&h.source))
            };
            format!("<li>{}{}</li>", anchor(&h.link, &h.title), source)
        })
        .collect();
    format!("<p style=\"margin:6px 0 0\"><strong>{}</strong></p><ul>{}</ul>", label, items)
}

fn research_entry(entry: &ResearchEntry) -> String {
    let f = &entry.fundamentals;

    let heading = if f.industry.is_empty() {
        format!("{} — {}", encode_text(&entry.symbol), encode_text(&f.name))
    } else {
        format!(
            "{} — {} ({})",
            encode_text(&entry.symbol),
            encode_text(&f.name),
            encode_text(&f.industry)
        )
    };

    let links = entry
        .links
        .iter()
        .map(|l| anchor(&l.url, &l.label))
        .collect::<Vec<_>>()
        .join(" | ");

    let metrics = table(
        &[
            "Mkt cap", "P/E", "P/S", "EV/EBITDA", "Op margin", "Net margin", "Rev growth",
            "EPS growth", "Debt/Eq",
        ],
        &[vec![
            f.market_cap.clone(),
            f.pe.clone(),
            f.ps.clone(),
            f.ev_ebitda.clone(),
            f.op_margin.clone(),
            f.net_margin.clone(),
            f.rev_growth.clone(),
            f.eps_growth.clone(),
            f.debt_eq.clone(),
        ]],
    );

    let news = if entry.news.is_empty() {
        empty_note("No recent headlines.")
    } else {
        format!(
            "{}{}",
            headline_list("CNBC mentions", &entry.news.cnbc),
            headline_list("Web buzz", &entry.news.buzz)
        )
    };

    format!(
        "<h4 style=\"margin:16px 0 4px\">{}</h4>\
         <p style=\"margin:0 0 6px;font-size:13px\">{}</p>\
         {}\
         <p style=\"margin:6px 0\"><strong>Stance:</strong> {} — {}</p>\
         {}",
        heading,
        links,
        metrics,
        encode_text(&f.stance),
        encode_text(&f.stance_reason),
        news
    )
}

fn research_pack(entries: &[ResearchEntry]) -> String {
    if entries.is_empty() {
        return empty_note("No symbols selected for research.");
    }
    entries.iter().map(research_entry).collect()
}

/// Render the full digest for `now` (already in the digest timezone).
pub fn render_digest(now: &DateTime<Tz>, sections: &DigestSections) -> RenderedEmail {
    let title = digest_title(now);

    let html = format!(
        "<div style=\"font-family:Arial,sans-serif;line-height:1.45;max-width:980px;margin:0 auto\">\
         <h2 style=\"margin-bottom:6px\">{title}</h2>\
         <p style=\"margin-top:0;color:#aaa;font-size:13px\">\
         Automated digest using rule-based signals. This may be wrong. Not investment advice.</p>\
         <h3 style=\"{h3}\">Top focus today</h3>{top_focus}\
         <h3 style=\"{h3}\">Market pulse</h3>{market}\
         <h3 style=\"{h3}\">Your holdings (watchlist-based)</h3>{holdings}\
         <h3 style=\"{h3}\">Risky watchlist</h3>{risky}\
         <h3 style=\"{h3}\">All alerts triggered</h3>{triggered}\
         <h3 style=\"{h3}\">Research pack</h3>{research}\
         <hr style=\"margin-top:22px;border:0;border-top:1px solid #222\" />\
         <p style=\"margin-top:10px;font-size:12px;color:#888\">\
         Tip: Add a Gmail filter to prevent these from landing in Spam.</p>\
         </div>",
        title = encode_text(&title),
        h3 = H3_STYLE,
        top_focus = top_focus_list(&sections.top_focus),
        market = market_pulse_table(&sections.market_pulse),
        holdings = signal_table(&sections.holdings),
        risky = signal_table(&sections.risky),
        triggered = triggered_list(&sections.triggered),
        research = research_pack(&sections.research),
    );

    RenderedEmail {
        subject: digest_subject(now),
        html,
    }
}
