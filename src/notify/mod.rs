// src/notify/mod.rs
//! Delivery of the daily pick.

pub mod email;

use chrono::{DateTime, Utc};

use crate::narrative::NarrativeDraft;
use crate::source::ContentItem;

/// The one article chosen for delivery, with its generated draft.
#[derive(Debug, Clone)]
pub struct DailyPick {
    pub article: ContentItem,
    pub draft: NarrativeDraft,
}

impl DailyPick {
    /// Issue shown in the message: the model's label, falling back to the
    /// filter's label, then "unknown".
    pub fn issue(&self) -> &str {
        self.draft
            .issue
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.article.issue.as_deref())
            .unwrap_or(crate::selector::UNKNOWN_ISSUE)
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn build_subject(pick: &DailyPick) -> String {
    format!(
        "Daily Pick — {}: {}",
        title_case(pick.issue()),
        pick.article.title
    )
}

pub fn build_text_body(pick: &DailyPick, now: DateTime<Utc>) -> String {
    format!(
        "Daily News Pick — {date}\n\n\
         Title: {title}\n\
         Issue: {issue}\n\
         Source: {source}\n\
         Link: {url}\n\n\
         Local impact:\n{stat}\n\n\
         Fundraising email draft:\n\n{email}\n",
        date = now.format("%Y-%m-%d"),
        title = pick.article.title,
        issue = pick.issue(),
        source = pick.article.source_id,
        url = pick.article.url,
        stat = pick.draft.local_stat.as_deref().unwrap_or_default(),
        email = pick.draft.email.as_deref().unwrap_or_default(),
    )
}

pub fn build_html_body(pick: &DailyPick, now: DateTime<Utc>) -> String {
    let esc = |s: &str| html_escape::encode_text(s).to_string();
    format!(
        r#"<div style="font-family:system-ui,-apple-system,Segoe UI,Roboto,Helvetica,Arial,sans-serif;line-height:1.5;">
  <h2 style="margin:0 0 12px 0;">Daily News Pick — {date}</h2>
  <h3 style="margin:0 0 6px 0;">{title}</h3>
  <div style="color:#666;margin-bottom:8px;">
    Issue: <strong>{issue}</strong> &nbsp;&bull;&nbsp; Source: <strong>{source}</strong>
  </div>
  <div style="margin:6px 0 14px 0;"><a href="{url}">{url}</a></div>
  <div style="margin:14px 0;">
    <div style="font-weight:600;margin-bottom:4px;">Local impact</div>
    <div>{stat}</div>
  </div>
  <hr style="border:none;border-top:1px solid #e5e7eb;margin:16px 0;">
  <div style="font-weight:600;margin-bottom:6px;">Fundraising email draft</div>
  <div style="white-space:pre-wrap;">{email}</div>
  <div style="color:#777;margin-top:16px;font-size:12px;">Sent automatically by the daily selector.</div>
</div>"#,
        date = now.format("%A, %B %d, %Y"),
        title = esc(&pick.article.title),
        issue = esc(pick.issue()),
        source = esc(&pick.article.source_id),
        url = esc(&pick.article.url),
        stat = esc(pick.draft.local_stat.as_deref().unwrap_or_default()),
        email = esc(pick.draft.email.as_deref().unwrap_or_default()),
    )
}
