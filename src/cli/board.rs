//! kanban board-wide commands: show, stats and the interactive board.

use std::path::PathBuf;

use crate::board::ListId;
use crate::cli::load_context;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct ShowOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct StatsOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct UiOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let view = ctx.session.view();

    let mut human = HumanOutput::new("");
    for (index, list) in view.lists.iter().enumerate() {
        if index > 0 {
            human.push_detail("");
        }
        human.push_detail(format!("{} ({})", list.title, list.cards.len()));
        if list.cards.is_empty() {
            human.push_detail("  (empty)");
        }
        for card in &list.cards {
            human.push_detail(format!("  {}  {}", card.task_id, card.text));
        }
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "show",
        &view,
        Some(&human),
    )
}

pub fn run_stats(options: StatsOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let stats = ctx.session.analytics();

    let mut human = HumanOutput::new("Board stats");
    human.push_summary("Total", stats.total.to_string());
    for list in ListId::ALL {
        human.push_summary(list.title(), stats.count(list).to_string());
    }
    human.push_summary("Complete", format!("{}%", stats.done_percent));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "stats",
        &stats,
        Some(&human),
    )
}

pub fn run_ui(options: UiOptions) -> Result<()> {
    if options.json {
        return Err(Error::InvalidArgument(
            "the interactive board does not support --json".to_string(),
        ));
    }
    if options.quiet {
        return Err(Error::InvalidArgument(
            "the interactive board does not support --quiet".to_string(),
        ));
    }
    let ctx = load_context(options.dir)?;
    crate::ui::board_viewer::run(ctx.session, ctx.config)
}
