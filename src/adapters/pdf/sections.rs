//! Section renderers: each draws one document block at the current cursor.

use std::io::Write;

use chrono::NaiveDate;

use crate::domain::plan::{
    CompleteAction, Evidence, NarrativeField, PlanGroup, PlanStatistics, ResolvedPlan,
};

use super::context::{
    Color, RenderContext, BLACK, CONTENT_WIDTH, GRAY_TEXT, LIGHT_FILL, MARGIN, WHITE,
};
use super::text::{self, Font};
use super::writer::ImageXObject;
use super::RenderError;

const BAND_COLOR: Color = (0.13, 0.29, 0.22);
const ZEBRA_FILL: Color = (0.96, 0.96, 0.96);

const BODY_SIZE: f32 = 10.0;
const CELL_SIZE: f32 = 9.0;

// Column widths as fractions of the content width: action, responsible,
// period, status.
const COLUMNS: [f32; 4] = [0.44, 0.20, 0.20, 0.16];
const CELL_PAD: f32 = 4.0;
const PILL_HEIGHT: f32 = 12.0;
const BAND_HEIGHT: f32 = 18.0;
const HEADER_ROW_HEIGHT: f32 = 14.0;

fn column_x(index: usize) -> f32 {
    MARGIN + COLUMNS[..index].iter().sum::<f32>() * CONTENT_WIDTH
}

fn column_width(index: usize) -> f32 {
    COLUMNS[index] * CONTENT_WIDTH
}

fn format_date(d: NaiveDate) -> String {
    d.format("%d/%m/%Y").to_string()
}

fn period_text(action: &CompleteAction) -> String {
    match (action.start_date(), action.end_date()) {
        (Some(s), Some(e)) => format!("{} – {}", format_date(s), format_date(e)),
        (Some(s), None) => format!("a partir de {}", format_date(s)),
        (None, Some(e)) => format!("até {}", format_date(e)),
        (None, None) => "—".to_string(),
    }
}

fn action_cell_text(action: &CompleteAction) -> String {
    match action.narrative() {
        Some(n) if !n.trim().is_empty() => format!("{}\n{}", action.template.title, n),
        _ => action.template.title.clone(),
    }
}

/// First-page banner: document title, organization name, issue date.
pub fn render_header<W: Write>(
    ctx: &mut RenderContext<W>,
    plan: &ResolvedPlan,
    today: NaiveDate,
) {
    let band_h = 64.0;
    ctx.fill_rect(0.0, 0.0, super::context::PAGE_WIDTH, band_h, BAND_COLOR);
    ctx.draw_text_line(MARGIN, 12.0, Font::HelveticaBold, 18.0, WHITE, "PLANO DE GESTÃO");
    ctx.draw_text_line(
        MARGIN,
        36.0,
        Font::Helvetica,
        11.0,
        WHITE,
        &plan.organization.name,
    );
    let issued = format!("Emitido em {}", format_date(today));
    let w = Font::Helvetica.text_width(9.0, &issued);
    ctx.draw_text_line(
        super::context::PAGE_WIDTH - MARGIN - w,
        40.0,
        Font::Helvetica,
        9.0,
        WHITE,
        &issued,
    );
    // The band ignores the top margin; park the cursor just below it.
    let below_band = band_h + 16.0;
    if below_band > ctx.cursor() {
        ctx.advance(below_band - ctx.cursor());
    }
}

/// One-line aggregate strip on a light background.
pub fn render_summary<W: Write>(
    ctx: &mut RenderContext<W>,
    stats: &PlanStatistics,
) -> Result<(), RenderError> {
    let line = stats.summary_line();
    let inner_width = CONTENT_WIDTH - 2.0 * CELL_PAD;
    let body_h = text::text_block_height(Font::Helvetica, 9.0, &line, inner_width);
    let strip_h = body_h + 2.0 * CELL_PAD;

    ctx.ensure_space(strip_h + 8.0)?;
    let y = ctx.cursor();
    ctx.fill_rect(MARGIN, y, CONTENT_WIDTH, strip_h, LIGHT_FILL);
    ctx.draw_wrapped(
        MARGIN + CELL_PAD,
        y + CELL_PAD,
        inner_width,
        Font::Helvetica,
        9.0,
        BLACK,
        &line,
    );
    ctx.advance(strip_h + 12.0);
    Ok(())
}

/// Title plus wrapped body; breaks per line so long narratives flow.
pub fn render_free_text<W: Write>(
    ctx: &mut RenderContext<W>,
    title: &str,
    field: &NarrativeField,
) -> Result<(), RenderError> {
    let Some(body) = field.text.as_deref().filter(|t| !t.trim().is_empty()) else {
        return Ok(());
    };

    let title_h = text::line_height(13.0);
    let lh = text::line_height(BODY_SIZE);
    ctx.ensure_space(title_h + 2.0 * lh)?;

    ctx.draw_text_line(MARGIN, ctx.cursor(), Font::HelveticaBold, 13.0, BLACK, title);
    ctx.advance(title_h + 4.0);

    for line in text::wrap_lines(Font::Helvetica, BODY_SIZE, body, CONTENT_WIDTH) {
        ctx.ensure_space(lh)?;
        if !line.is_empty() {
            let y = ctx.cursor();
            ctx.draw_text_line(MARGIN, y, Font::Helvetica, BODY_SIZE, BLACK, &line);
        }
        ctx.advance(lh);
    }
    ctx.advance(10.0);
    Ok(())
}

/// Height of one table row, reused for the break test and the draw.
fn row_height(action: &CompleteAction) -> f32 {
    let action_h = text::text_block_height(
        Font::Helvetica,
        CELL_SIZE,
        &action_cell_text(action),
        column_width(0) - 2.0 * CELL_PAD,
    );
    let responsible_h = text::text_block_height(
        Font::Helvetica,
        CELL_SIZE,
        action.responsible().unwrap_or("—"),
        column_width(1) - 2.0 * CELL_PAD,
    );
    let period_h = text::text_block_height(
        Font::Helvetica,
        CELL_SIZE,
        &period_text(action),
        column_width(2) - 2.0 * CELL_PAD,
    );
    action_h
        .max(responsible_h)
        .max(period_h)
        .max(PILL_HEIGHT)
        + 2.0 * CELL_PAD
}

fn draw_group_band<W: Write>(ctx: &mut RenderContext<W>, heading: &str) {
    let y = ctx.cursor();
    ctx.fill_rect(MARGIN, y, CONTENT_WIDTH, BAND_HEIGHT, BAND_COLOR);
    ctx.draw_text_line(
        MARGIN + CELL_PAD,
        y + 4.0,
        Font::HelveticaBold,
        10.0,
        WHITE,
        heading,
    );
    ctx.advance(BAND_HEIGHT);
}

fn draw_column_headers<W: Write>(ctx: &mut RenderContext<W>) {
    let y = ctx.cursor();
    ctx.fill_rect(MARGIN, y, CONTENT_WIDTH, HEADER_ROW_HEIGHT, LIGHT_FILL);
    for (i, label) in ["Ação", "Responsável", "Período", "Status"]
        .iter()
        .enumerate()
    {
        ctx.draw_text_line(
            column_x(i) + CELL_PAD,
            y + 3.0,
            Font::HelveticaBold,
            8.0,
            BLACK,
            label,
        );
    }
    ctx.advance(HEADER_ROW_HEIGHT);
}

fn draw_status_pill<W: Write>(
    ctx: &mut RenderContext<W>,
    action: &CompleteAction,
    y: f32,
    today: NaiveDate,
) {
    let status = action.status(today);
    let pill_w = column_width(3) - 2.0 * CELL_PAD;
    let x = column_x(3) + CELL_PAD;
    ctx.fill_rect(x, y, pill_w, PILL_HEIGHT, status.pill_color());
    let label = status.label();
    let lw = Font::HelveticaBold.text_width(7.0, label);
    ctx.draw_text_line(
        x + (pill_w - lw).max(0.0) / 2.0,
        y + 2.5,
        Font::HelveticaBold,
        7.0,
        WHITE,
        label,
    );
}

fn draw_row<W: Write>(
    ctx: &mut RenderContext<W>,
    action: &CompleteAction,
    height: f32,
    zebra: bool,
    today: NaiveDate,
) {
    let y = ctx.cursor();
    if zebra {
        ctx.fill_rect(MARGIN, y, CONTENT_WIDTH, height, ZEBRA_FILL);
    }
    ctx.draw_wrapped(
        column_x(0) + CELL_PAD,
        y + CELL_PAD,
        column_width(0) - 2.0 * CELL_PAD,
        Font::Helvetica,
        CELL_SIZE,
        BLACK,
        &action_cell_text(action),
    );
    ctx.draw_wrapped(
        column_x(1) + CELL_PAD,
        y + CELL_PAD,
        column_width(1) - 2.0 * CELL_PAD,
        Font::Helvetica,
        CELL_SIZE,
        BLACK,
        action.responsible().unwrap_or("—"),
    );
    ctx.draw_wrapped(
        column_x(2) + CELL_PAD,
        y + CELL_PAD,
        column_width(2) - 2.0 * CELL_PAD,
        Font::Helvetica,
        CELL_SIZE,
        BLACK,
        &period_text(action),
    );
    draw_status_pill(ctx, action, y + CELL_PAD, today);
    ctx.stroke_line(
        MARGIN,
        y + height,
        MARGIN + CONTENT_WIDTH,
        y + height,
        0.4,
        (0.8, 0.8, 0.8),
    );
}

/// Grouped table: colored band, column headers, zebra rows, status pills.
///
/// Suppressed actions are skipped; when rows spill onto a new page the
/// band is redrawn with a "(continuação)" mark before rows resume.
pub fn render_group_table<W: Write>(
    ctx: &mut RenderContext<W>,
    group: &PlanGroup,
    today: NaiveDate,
) -> Result<(), RenderError> {
    let visible: Vec<&CompleteAction> = group.visible_actions().collect();
    if visible.is_empty() {
        return Ok(());
    }

    let heading = group.heading();
    ctx.ensure_space(BAND_HEIGHT + HEADER_ROW_HEIGHT + 3.0 * text::line_height(CELL_SIZE))?;
    draw_group_band(ctx, &heading);
    draw_column_headers(ctx);

    for (i, action) in visible.iter().enumerate() {
        // Computed once; reused for the break test and the draw.
        let height = row_height(action);
        if ctx.ensure_space(height)? {
            draw_group_band(ctx, &format!("{} (continuação)", heading));
            draw_column_headers(ctx);
        }
        draw_row(ctx, action, height, i % 2 == 1, today);
        ctx.advance(height);
    }
    ctx.advance(14.0);
    Ok(())
}

/// Notice drawn when no category has any visible action.
pub fn render_no_actions_notice<W: Write>(
    ctx: &mut RenderContext<W>,
) -> Result<(), RenderError> {
    let lh = text::line_height(BODY_SIZE);
    ctx.ensure_space(lh)?;
    let y = ctx.cursor();
    ctx.draw_text_line(
        MARGIN,
        y,
        Font::HelveticaOblique,
        BODY_SIZE,
        GRAY_TEXT,
        "Nenhuma ação visível neste plano: todas as ações foram marcadas como não aplicáveis.",
    );
    ctx.advance(lh);
    Ok(())
}

const GALLERY_COLUMNS: usize = 3;
const GALLERY_GAP: f32 = 10.0;
const CAPTION_SIZE: f32 = 8.0;

/// Photo grid plus attendance-list bullets. Draws nothing when empty.
///
/// Each grid cell reserves a fixed 4:3 box; unreadable artifacts get a
/// placeholder instead of failing the render. Breaks happen per grid row
/// and per list item.
pub fn render_gallery<W: Write>(
    ctx: &mut RenderContext<W>,
    photos: &[(Evidence, Option<ImageXObject>)],
    attendance_lists: &[Evidence],
) -> Result<(), RenderError> {
    if photos.is_empty() && attendance_lists.is_empty() {
        return Ok(());
    }

    let title_h = text::line_height(13.0);
    ctx.ensure_space(title_h + 8.0)?;
    ctx.draw_text_line(
        MARGIN,
        ctx.cursor(),
        Font::HelveticaBold,
        13.0,
        BLACK,
        "Evidências",
    );
    ctx.advance(title_h + 8.0);

    let cell_w =
        (CONTENT_WIDTH - (GALLERY_COLUMNS as f32 - 1.0) * GALLERY_GAP) / GALLERY_COLUMNS as f32;
    let image_h = cell_w * 0.75;
    let caption_h = 2.0 * text::line_height(CAPTION_SIZE);
    let row_h = image_h + 4.0 + caption_h + 10.0;

    for row in photos.chunks(GALLERY_COLUMNS) {
        ctx.ensure_space(row_h)?;
        let y = ctx.cursor();
        for (i, (evidence, image)) in row.iter().enumerate() {
            let x = MARGIN + i as f32 * (cell_w + GALLERY_GAP);
            match image {
                Some(image) => {
                    let id = ctx.add_image(image)?;
                    ctx.draw_image(id, x, y, cell_w, image_h);
                }
                None => {
                    ctx.fill_rect(x, y, cell_w, image_h, LIGHT_FILL);
                    let note = "Imagem indisponível";
                    let w = Font::HelveticaOblique.text_width(CAPTION_SIZE, note);
                    ctx.draw_text_line(
                        x + (cell_w - w).max(0.0) / 2.0,
                        y + image_h / 2.0 - CAPTION_SIZE,
                        Font::HelveticaOblique,
                        CAPTION_SIZE,
                        GRAY_TEXT,
                        note,
                    );
                }
            }
            let caption_lines =
                text::wrap_lines(Font::Helvetica, CAPTION_SIZE, evidence.display_caption(), cell_w);
            for (li, line) in caption_lines.iter().take(2).enumerate() {
                ctx.draw_text_line(
                    x,
                    y + image_h + 4.0 + li as f32 * text::line_height(CAPTION_SIZE),
                    Font::Helvetica,
                    CAPTION_SIZE,
                    GRAY_TEXT,
                    line,
                );
            }
        }
        ctx.advance(row_h);
    }

    if !attendance_lists.is_empty() {
        let sub_h = text::line_height(11.0);
        let lh = text::line_height(BODY_SIZE);
        ctx.ensure_space(sub_h + lh + 8.0)?;
        ctx.advance(6.0);
        ctx.draw_text_line(
            MARGIN,
            ctx.cursor(),
            Font::HelveticaBold,
            11.0,
            BLACK,
            "Listas de Presença",
        );
        ctx.advance(sub_h + 4.0);

        for item in attendance_lists {
            ctx.ensure_space(lh)?;
            let y = ctx.cursor();
            let line = format!("• {}", item.display_caption());
            ctx.draw_text_line(MARGIN + 6.0, y, Font::Helvetica, BODY_SIZE, BLACK, &line);
            ctx.advance(lh);
        }
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
