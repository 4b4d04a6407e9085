//! Lease summary report: the fixed section sequence and the layout primitives
//! it is built from.

pub mod blocks;
pub mod cursor;
pub mod table;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::date_math::{check_date_order, years_remaining};
use crate::error::Error;
use crate::fonts::FontStyle;
use crate::model::LeaseSnapshot;
use crate::surface::{Color, Surface, TextAlign};

use blocks::{KeyValue, NoteTier};
use cursor::{LayoutCursor, PageGeometry};
use table::{Table, render_table};

pub const DOCUMENT_TITLE: &str = "Lease Summary";

/// Section headings in the order they appear in every report.
pub const SECTION_TITLES: [&str; 9] = [
    "Tenant Information",
    "Lease Term",
    "Rent Information",
    "Rent Components",
    "Rent Escalations",
    "Renewal Options",
    "Recovery Terms",
    "Risk Analysis",
    "Market Analysis",
];

pub const MARKET_ANALYSIS: &str = "Current rent is approximately 5% above market rate for \
similar properties in the Brooklyn area. While this presents strong current income, it may \
pose challenges for renewal negotiations.";

/// Space kept free under a table-section heading so it is never orphaned.
const KEEP_WITH_TABLE: f32 = 50.0;
const KEEP_WITH_RISKS: f32 = 60.0;
const TABLE_TRAILING: f32 = 10.0;
const RECOVERY_GAP: f32 = 10.0;
const RECOVERY_TRAILING: f32 = 15.0;
const FOOTER_SIZE: f32 = 8.0;
const FOOTER_COLOR: Color = Color::gray(150);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSummary {
    pub pages: usize,
    /// Cursor position on the last page after the final section.
    pub final_y: f32,
}

/// `M/D/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Whole dollars with thousands separators, e.g. `$142,896,000`.
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Two-decimal money amount, e.g. `$12.50`.
pub fn format_amount(value: f64) -> String {
    format!("${value:.2}")
}

/// Fail with `MissingRequiredField` when a fixed section has nothing to show.
/// Runs before anything is drawn: a document with a missing section is never
/// produced, not even partially.
pub fn check_required_fields(snapshot: &LeaseSnapshot) -> Result<(), Error> {
    let lease = &snapshot.lease;
    let required: [(&'static str, bool); 5] = [
        ("tenant.name", snapshot.tenant.name.trim().is_empty()),
        ("lease.rentComponents", lease.rent_components.is_empty()),
        ("lease.recoveryTerms.cam", lease.recovery_terms.cam.trim().is_empty()),
        ("lease.recoveryTerms.taxes", lease.recovery_terms.taxes.trim().is_empty()),
        (
            "lease.recoveryTerms.insurance",
            lease.recovery_terms.insurance.trim().is_empty(),
        ),
    ];
    match required.iter().find(|(_, missing)| *missing) {
        Some(&(field, _)) => Err(Error::MissingRequiredField(field)),
        None => Ok(()),
    }
}

/// Drives one render pass over a fresh [`LayoutCursor`].
pub struct ReportComposer<'a, S: Surface + ?Sized> {
    snapshot: &'a LeaseSnapshot,
    now: DateTime<Utc>,
    cursor: LayoutCursor,
    surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> ReportComposer<'a, S> {
    pub fn new(
        snapshot: &'a LeaseSnapshot,
        now: DateTime<Utc>,
        geometry: PageGeometry,
        surface: &'a mut S,
    ) -> Self {
        Self {
            snapshot,
            now,
            cursor: LayoutCursor::new(geometry),
            surface,
        }
    }

    pub fn compose(mut self) -> Result<RenderSummary, Error> {
        let lease = &self.snapshot.lease;
        check_date_order(lease.start_date, lease.expiry_date)?;
        check_required_fields(self.snapshot)?;

        blocks::document_title(&mut self.cursor, self.surface, DOCUMENT_TITLE)?;
        self.tenant()?;
        self.lease_term()?;
        self.rent_information()?;
        self.rent_components()?;
        self.escalations()?;
        self.renewals()?;
        self.recovery_terms()?;
        self.risk_analysis()?;
        self.footer()?;

        let summary = RenderSummary {
            pages: self.cursor.page() + 1,
            final_y: self.cursor.y(),
        };
        log::debug!("report composed: {} page(s)", summary.pages);
        Ok(summary)
    }

    fn tenant(&mut self) -> Result<(), Error> {
        let tenant = &self.snapshot.tenant;
        blocks::section_title(&mut self.cursor, self.surface, SECTION_TITLES[0])?;
        let items = [
            KeyValue::new("Name:", &tenant.name),
            KeyValue::new("Credit Rating:", &tenant.credit_rating),
            KeyValue::new("Industry:", &tenant.industry),
            KeyValue::new("Parent Company:", &tenant.parent_company),
        ];
        blocks::key_value_grid(&mut self.cursor, self.surface, &items, 1)
    }

    fn lease_term(&mut self) -> Result<(), Error> {
        let lease = &self.snapshot.lease;
        let remaining = years_remaining(self.now, lease.expiry_date);
        blocks::section_title(&mut self.cursor, self.surface, SECTION_TITLES[1])?;
        let items = [
            KeyValue::new("Start Date:", format_date(lease.start_date)),
            KeyValue::new("Expiry Date:", format_date(lease.expiry_date)),
            KeyValue::new("Term:", format!("{} years", lease.term)),
            KeyValue::new("Remaining:", format!("{remaining:.1} years")),
        ];
        blocks::key_value_grid(&mut self.cursor, self.surface, &items, 1)
    }

    fn rent_information(&mut self) -> Result<(), Error> {
        let lease = &self.snapshot.lease;
        let escalation = lease
            .escalations
            .first()
            .map(|e| format!("{} annually", e.rate))
            .unwrap_or_else(|| "N/A".to_string());
        blocks::section_title(&mut self.cursor, self.surface, SECTION_TITLES[2])?;
        let items = [
            KeyValue::new("Base Rent:", format!("${} PSF", lease.base_rent)),
            KeyValue::new(
                "Total Rent:",
                format!("{} PSF", format_amount(lease.total_rent())),
            ),
            KeyValue::new(
                "Annual Rent:",
                format_currency(lease.annual_rent(self.snapshot.property.square_footage)),
            ),
            KeyValue::new("Escalation:", escalation),
        ];
        blocks::key_value_grid(&mut self.cursor, self.surface, &items, 1)
    }

    fn table_section(&mut self, title: &str, table: &Table) -> Result<(), Error> {
        self.cursor.keep_with_next(KEEP_WITH_TABLE, self.surface)?;
        blocks::section_title(&mut self.cursor, self.surface, title)?;
        render_table(&mut self.cursor, self.surface, table)?;
        self.cursor.advance(TABLE_TRAILING);
        Ok(())
    }

    fn rent_components(&mut self) -> Result<(), Error> {
        let lease = &self.snapshot.lease;
        let mut rows: Vec<Vec<String>> = lease
            .rent_components
            .iter()
            .map(|c| {
                let amount = format_amount(c.amount);
                let amount = if c.psf { format!("{amount} PSF") } else { amount };
                vec![c.kind.clone(), amount]
            })
            .collect();
        rows.push(vec![
            "Total".to_string(),
            format!("{} PSF", format_amount(lease.total_rent())),
        ]);
        let table = Table::new(&["Component", "Amount"], rows)
            .align(&[TextAlign::Left, TextAlign::Right])
            .emphasize_last_row();
        self.table_section(SECTION_TITLES[3], &table)
    }

    fn escalations(&mut self) -> Result<(), Error> {
        let rows = self
            .snapshot
            .lease
            .escalations
            .iter()
            .map(|e| {
                vec![
                    format!("Year {}", e.year),
                    e.rate.clone(),
                    format_amount(e.amount),
                ]
            })
            .collect();
        let table = Table::new(&["Year", "Increase", "Rent (PSF)"], rows).align(&[
            TextAlign::Left,
            TextAlign::Center,
            TextAlign::Right,
        ]);
        self.table_section(SECTION_TITLES[4], &table)
    }

    fn renewals(&mut self) -> Result<(), Error> {
        let rows = self
            .snapshot
            .lease
            .renewal_options
            .iter()
            .enumerate()
            .map(|(i, o)| {
                vec![
                    format!("Option {}", i + 1),
                    format!("{} years", o.term),
                    o.kind.clone(),
                    o.notice.clone(),
                ]
            })
            .collect();
        let table = Table::new(&["Option", "Term", "Type", "Notice Period"], rows);
        self.table_section(SECTION_TITLES[5], &table)
    }

    fn recovery_terms(&mut self) -> Result<(), Error> {
        let terms = &self.snapshot.lease.recovery_terms;
        self.cursor.keep_with_next(KEEP_WITH_TABLE, self.surface)?;
        blocks::section_title(&mut self.cursor, self.surface, SECTION_TITLES[6])?;

        let entries = [
            ("CAM (Common Area Maintenance)", &terms.cam, RECOVERY_GAP),
            ("Property Taxes", &terms.taxes, RECOVERY_GAP),
            ("Insurance", &terms.insurance, RECOVERY_TRAILING),
        ];
        for (title, text, trailing) in entries {
            self.cursor.keep_with_next(2.0 * RECOVERY_GAP, self.surface)?;
            blocks::subsection_title(&mut self.cursor, self.surface, title)?;
            blocks::body_text(&mut self.cursor, self.surface, text, trailing)?;
        }
        Ok(())
    }

    fn risk_analysis(&mut self) -> Result<(), Error> {
        let snapshot = self.snapshot;
        self.cursor.keep_with_next(KEEP_WITH_RISKS, self.surface)?;
        blocks::section_title(&mut self.cursor, self.surface, SECTION_TITLES[7])?;
        for factor in &snapshot.risk_factors {
            let tier = factor.tier();
            let note_tier = NoteTier::from(tier);
            if note_tier == NoteTier::Neutral {
                log::warn!(
                    "Unrecognised risk level {:?} for {:?}; using neutral styling",
                    factor.risk,
                    factor.kind
                );
            }
            let title = format!("{} ({} Risk)", factor.kind, factor.risk);
            blocks::colored_note(
                &mut self.cursor,
                self.surface,
                &title,
                &factor.description,
                note_tier,
            )?;
        }
        blocks::colored_note(
            &mut self.cursor,
            self.surface,
            SECTION_TITLES[8],
            MARKET_ANALYSIS,
            NoteTier::Info,
        )
    }

    /// Generation stamp at the fixed footer baseline. Drawn last, so it lands on
    /// the final page only.
    fn footer(&mut self) -> Result<(), Error> {
        let geometry = *self.cursor.geometry();
        let text = format!("Generated on {}", format_date(self.now.date_naive()));
        blocks::pinned_text(
            self.surface,
            &text,
            geometry.margin,
            geometry.footer_y,
            FontStyle::Italic,
            FOOTER_SIZE,
            FOOTER_COLOR,
        )
    }
}

/// Compose the report for `snapshot` onto `surface` using A4 geometry.
pub fn compose_report<S: Surface + ?Sized>(
    snapshot: &LeaseSnapshot,
    now: DateTime<Utc>,
    surface: &mut S,
) -> Result<RenderSummary, Error> {
    ReportComposer::new(snapshot, now, PageGeometry::a4(), surface).compose()
}
