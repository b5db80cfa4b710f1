use anyhow::Result;

use tabledash::chart::{render_dashboard, write_charts, ChartSpec};
use tabledash::config::Config;
use tabledash::logging::{
    self, log_load_failed, log_mounted, log_page_loaded, log_panel, log_reload_armed, log_rendered, obj, v_str,
    Domain, Level, ProfileScope,
};
use tabledash::page::{page_digest, PageData};
use tabledash::refresh::RefreshController;
use tabledash::source::{SnapshotSource, SourceKind};

/// One page load: fetch, mount, render, write. Every call starts from nothing.
async fn load_and_render(source: &(dyn SnapshotSource + Send + Sync), cfg: &Config) -> Result<Vec<ChartSpec>> {
    let html = source.load().await.map_err(|err| {
        log_load_failed("source", &format!("{:#}", err));
        err
    })?;
    log_page_loaded(&source.describe(), &page_digest(&html), html.len());

    let data = PageData::from_html(&html).map_err(|err| {
        log_load_failed("mount", &err.to_string());
        err
    })?;
    log_mounted(
        data.system.len(),
        data.tables.table_count(),
        data.tables.cell_count(),
        data.latency.is_some(),
    );

    let charts = {
        let _scope = ProfileScope::new(Domain::Render, "render_dashboard");
        render_dashboard(&data)
    };
    for chart in &charts {
        log_panel(chart);
    }

    write_charts(&cfg.out_path, &charts).map_err(|err| {
        log_load_failed("write", &format!("{:#}", err));
        err
    })?;
    let empty = charts.iter().filter(|c| c.series.is_empty()).count();
    log_rendered(charts.len(), empty, &cfg.out_path);
    Ok(charts)
}

fn log_reload_skipped(err: &anyhow::Error) {
    logging::log(
        Level::Warn,
        Domain::Refresh,
        "reload_failed",
        obj(&[("msg", v_str(&format!("{:#}", err)))]),
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let once = std::env::args().skip(1).any(|a| a == "--once");
    let cfg = Config::from_env();
    let source = SourceKind::from_env().build(&cfg)?;
    let refresh = RefreshController::new(cfg.refresh_delay());

    logging::log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("source", v_str(&source.describe())),
            ("out", v_str(&cfg.out_path)),
            ("version", v_str(env!("CARGO_PKG_VERSION"))),
        ]),
    );

    if once {
        load_and_render(source.as_ref(), &cfg).await?;
        return Ok(());
    }

    // A failed load leaves the previous output in place; only the next reload recovers.
    if let Err(err) = load_and_render(source.as_ref(), &cfg).await {
        log_reload_skipped(&err);
    }
    loop {
        log_reload_armed(cfg.refresh_secs);
        if let Err(err) = refresh.wait_then(|| load_and_render(source.as_ref(), &cfg)).await {
            log_reload_skipped(&err);
        }
    }
}
