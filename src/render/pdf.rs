use crate::domain::model::{Debt, OptimizationResult};
use crate::render::format_currency;
use crate::render::table::comparison_rows;
use crate::utils::error::{DebtClearError, Result};
use chrono::NaiveDate;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rect, Rgb,
};
use rust_decimal::Decimal;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const LEFT: f32 = 20.0;
const RIGHT: f32 = 190.0;
const TOP: f32 = 275.0;
const BOTTOM_MARGIN: f32 = 25.0;
const LINE_HEIGHT: f32 = 5.5;
const WRAP_COLUMNS: usize = 92;
const HEADING_COLUMNS: usize = 76;
const NAME_COLUMNS: usize = 26;
const LAYER: &str = "Layer 1";

pub fn pdf_filename(date: NaiveDate) -> String {
    format!("DebtClear-AI-Plan-{}.pdf", date.format("%Y-%m-%d"))
}

/// Everything the exported plan shows.
#[derive(Debug, Clone, Copy)]
pub struct PlanDocument<'a> {
    pub debts: &'a [Debt],
    pub monthly_budget: Decimal,
    pub result: &'a OptimizationResult,
    pub generated_on: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

fn pdf_error(e: printpdf::Error) -> DebtClearError {
    DebtClearError::PdfError {
        message: format!("{:?}", e),
    }
}

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// Builtin PDF fonts only cover a Latin-1 subset, so the pound sign and
/// anything outside ASCII is spelled out or dropped.
fn pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '£' => out.push_str("GBP "),
            '\n' | '\t' => out.push(' '),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => {}
        }
    }
    out
}

fn money(amount: Decimal) -> String {
    pdf_text(&format_currency(amount))
}

/// Shortens text to fit a fixed-width table cell.
fn fit_cell(text: &str, columns: usize) -> String {
    let text = pdf_text(text);
    if text.len() <= columns {
        return text;
    }
    let mut cut: String = text.chars().take(columns.saturating_sub(3)).collect();
    cut.truncate(cut.trim_end().len());
    cut.push_str("...");
    cut
}

pub fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > columns {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

struct PageWriter<'d> {
    doc: &'d PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    pages: usize,
}

impl<'d> PageWriter<'d> {
    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.pages += 1;
        self.y = TOP;
        self.footer();
    }

    /// Starts a new page once the cursor would cross the bottom margin.
    fn ensure_space(&mut self, height: f32) {
        if self.y - height < BOTTOM_MARGIN {
            self.new_page();
        }
    }

    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(pdf_text(text), size, Mm(x), Mm(self.y), font);
    }

    fn advance(&mut self, height: f32) {
        self.y -= height;
    }

    fn rule(&self) {
        self.layer.set_outline_color(rgb(0.8, 0.8, 0.85));
        self.layer.set_outline_thickness(0.5);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(LEFT), Mm(self.y + 1.5)), false),
                (Point::new(Mm(RIGHT), Mm(self.y + 1.5)), false),
            ],
            is_closed: false,
        });
    }

    fn footer(&self) {
        self.layer.set_fill_color(rgb(0.5, 0.5, 0.55));
        self.layer.use_text(
            format!("DebtClear AI - page {}", self.pages),
            8.0,
            Mm(LEFT),
            Mm(12.0),
            &self.regular,
        );
        self.layer.set_fill_color(rgb(0.1, 0.1, 0.15));
    }

    fn section_title(&mut self, title: &str) {
        self.ensure_space(14.0);
        self.advance(6.0);
        self.layer.set_fill_color(rgb(0.31, 0.27, 0.9));
        self.text(title, 14.0, LEFT, true);
        self.layer.set_fill_color(rgb(0.1, 0.1, 0.15));
        self.advance(8.0);
    }

    fn row(&mut self, cells: &[(f32, &str)], bold: bool) {
        self.ensure_space(LINE_HEIGHT);
        for (x, cell) in cells {
            self.text(cell, 10.0, *x, bold);
        }
        self.advance(LINE_HEIGHT);
        if bold {
            self.rule();
        }
    }

    fn paragraph(&mut self, text: &str) {
        for line in wrap_text(&pdf_text(text), WRAP_COLUMNS) {
            self.ensure_space(LINE_HEIGHT);
            self.text(&line, 10.0, LEFT + 4.0, false);
            self.advance(LINE_HEIGHT);
        }
    }
}

/// Renders the plan fully in memory; nothing touches disk here.
pub fn render_pdf(plan: &PlanDocument<'_>) -> Result<RenderedPdf> {
    let (doc, page, layer) = PdfDocument::new(
        "DebtClear AI - Debt Freedom Plan",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        LAYER,
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let pages = {
        let mut writer = PageWriter {
            doc: &doc,
            layer: doc.get_page(page).get_layer(layer),
            regular,
            bold,
            y: TOP,
            pages: 1,
        };
        writer.footer();
        write_header(&mut writer, plan);
        write_debts(&mut writer, plan);
        write_strategies(&mut writer, plan.result);
        write_explanations(&mut writer, plan.result);
        writer.pages
    };

    let bytes = doc.save_to_bytes().map_err(pdf_error)?;
    tracing::debug!("Rendered PDF: {} pages, {} bytes", pages, bytes.len());
    Ok(RenderedPdf { bytes, pages })
}

fn write_header(w: &mut PageWriter<'_>, plan: &PlanDocument<'_>) {
    w.layer.set_fill_color(rgb(0.31, 0.27, 0.9));
    w.layer.add_rect(Rect::new(
        Mm(0.0),
        Mm(PAGE_HEIGHT - 32.0),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
    ));

    w.layer.set_fill_color(rgb(1.0, 1.0, 1.0));
    w.y = PAGE_HEIGHT - 16.0;
    w.text("DebtClear AI", 22.0, LEFT, true);
    w.y = PAGE_HEIGHT - 25.0;
    w.text("Your Personalised Debt Freedom Plan", 12.0, LEFT, false);

    w.layer.set_fill_color(rgb(0.1, 0.1, 0.15));
    w.y = PAGE_HEIGHT - 42.0;
    w.text(
        &format!("Generated: {}", plan.generated_on.format("%d %B %Y")),
        10.0,
        LEFT,
        false,
    );
    w.advance(LINE_HEIGHT);
    w.text(
        &format!("Monthly budget: {}", money(plan.monthly_budget)),
        10.0,
        LEFT,
        false,
    );
    w.advance(LINE_HEIGHT);
}

fn write_debts(w: &mut PageWriter<'_>, plan: &PlanDocument<'_>) {
    w.section_title("Your Debts");
    w.row(
        &[
            (LEFT, "Name"),
            (70.0, "Type"),
            (110.0, "Balance"),
            (145.0, "APR"),
            (165.0, "Min Payment"),
        ],
        true,
    );

    let mut total = Decimal::ZERO;
    for debt in plan.debts.iter().filter(|d| d.balance > Decimal::ZERO) {
        total += debt.balance;
        let name = fit_cell(&debt.name, NAME_COLUMNS);
        let balance = money(debt.balance);
        let apr = format!("{:.2}%", debt.apr);
        let min = money(debt.min_payment);
        w.row(
            &[
                (LEFT, name.as_str()),
                (70.0, debt.debt_type.label()),
                (110.0, balance.as_str()),
                (145.0, apr.as_str()),
                (165.0, min.as_str()),
            ],
            false,
        );
    }
    let total = money(total);
    w.row(&[(LEFT, "Total"), (110.0, total.as_str())], true);
}

fn write_strategies(w: &mut PageWriter<'_>, result: &OptimizationResult) {
    w.section_title("Strategy Comparison");
    w.row(
        &[
            (LEFT, "Strategy"),
            (100.0, "Months"),
            (125.0, "Total Interest"),
            (160.0, "Interest Saved"),
        ],
        true,
    );

    for row in comparison_rows(result) {
        let name = if row.recommended {
            format!("{} *", row.kind.label())
        } else {
            row.kind.label().to_string()
        };
        let months = row.months.to_string();
        let interest = money(row.total_interest);
        let saved = money(row.interest_saved);
        w.row(
            &[
                (LEFT, name.as_str()),
                (100.0, months.as_str()),
                (125.0, interest.as_str()),
                (160.0, saved.as_str()),
            ],
            row.recommended,
        );
    }
}

fn write_explanations(w: &mut PageWriter<'_>, result: &OptimizationResult) {
    w.section_title("Why This Order?");

    let explanations = result.sorted_explanations();
    if explanations.is_empty() {
        w.paragraph("No detailed explanations were provided for this plan.");
        return;
    }

    for explanation in explanations {
        let heading = format!("#{} {}", explanation.rank, explanation.debt_name);
        w.ensure_space(LINE_HEIGHT * 2.0);
        for line in wrap_text(&pdf_text(&heading), HEADING_COLUMNS) {
            w.ensure_space(LINE_HEIGHT + 1.0);
            w.text(&line, 11.0, LEFT, true);
            w.advance(LINE_HEIGHT + 1.0);
        }
        w.paragraph(&explanation.explanation);
        w.advance(2.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DebtType, Explanation, StrategyResult, Strategies};
    use rust_decimal_macros::dec;

    fn debts() -> Vec<Debt> {
        vec![
            Debt::new("Barclaycard", DebtType::CreditCard, dec!(3200), dec!(80)),
            Debt::new("Paid off", DebtType::StoreCard, Decimal::ZERO, Decimal::ZERO),
        ]
    }

    fn result(explanations: Vec<Explanation>) -> OptimizationResult {
        OptimizationResult {
            success: true,
            recommended: "hybrid".into(),
            strategies: Strategies {
                avalanche: StrategyResult { months_to_freedom: 12, total_interest: dec!(410), ..Default::default() },
                snowball: StrategyResult { months_to_freedom: 13, total_interest: dec!(455), ..Default::default() },
                hybrid: StrategyResult { months_to_freedom: 12, total_interest: dec!(420), ..Default::default() },
            },
            explanations,
            ..Default::default()
        }
    }

    fn render(result: &OptimizationResult) -> RenderedPdf {
        let debts = debts();
        render_pdf(&PlanDocument {
            debts: &debts,
            monthly_budget: dec!(450),
            result,
            generated_on: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        })
        .unwrap()
    }

    #[test]
    fn test_filename_contains_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(pdf_filename(date), "DebtClear-AI-Plan-2026-03-07.pdf");
    }

    #[test]
    fn test_renders_with_zero_explanations() {
        let pdf = render(&result(vec![]));
        assert!(pdf.bytes.starts_with(b"%PDF"));
        assert_eq!(pdf.pages, 1);
    }

    #[test]
    fn test_long_explanations_paginate() {
        let long = "Paying this card first clears the highest interest charge every month. ".repeat(60);
        let explanations = (1..=6)
            .map(|rank| Explanation {
                debt_name: format!("Debt {}", rank),
                rank,
                explanation: long.clone(),
                ..Default::default()
            })
            .collect();

        let pdf = render(&result(explanations));
        assert!(pdf.bytes.starts_with(b"%PDF"));
        assert!(pdf.pages > 2);
    }

    #[test]
    fn test_wrap_text_respects_columns() {
        let lines = wrap_text("one two three four five six", 9);
        assert_eq!(lines, vec!["one two", "three", "four five", "six"]);
        assert!(wrap_text("   ", 10).is_empty());
    }

    #[test]
    fn test_long_names_are_cut_to_the_column() {
        let name = "Barclaycard Platinum Balance Transfer (old account)";
        let cell = fit_cell(name, NAME_COLUMNS);
        assert_eq!(cell.len(), NAME_COLUMNS);
        assert!(cell.ends_with("..."));
        assert_eq!(fit_cell("Visa", NAME_COLUMNS), "Visa");
    }

    #[test]
    fn test_renders_long_debt_names_and_headings() {
        let long_name = "Very long store card name that keeps going well past the table column ".repeat(3);
        let debts = vec![Debt::new(long_name.as_str(), DebtType::StoreCard, dec!(900), dec!(25))];
        let result = result(vec![Explanation {
            debt_name: long_name.clone(),
            rank: 1,
            explanation: "Smallest balance.".into(),
            ..Default::default()
        }]);

        let pdf = render_pdf(&PlanDocument {
            debts: &debts,
            monthly_budget: dec!(200),
            result: &result,
            generated_on: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        })
        .unwrap();
        assert!(pdf.bytes.starts_with(b"%PDF"));
        assert_eq!(pdf.pages, 1);
        assert!(wrap_text(&format!("#1 {}", long_name), HEADING_COLUMNS).len() > 1);
    }

    #[test]
    fn test_pdf_text_replaces_pound_sign() {
        assert_eq!(pdf_text("£1,200 ★ saved"), "GBP 1,200  saved");
    }
}
