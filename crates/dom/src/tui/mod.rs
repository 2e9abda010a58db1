//! TUI (Terminal User Interface) モジュール
//!
//! ratatuiを使用したリソースブラウザ

mod app;
mod terminal;
mod ui;

use app::App;
use crossterm::event::{self, Event, KeyEventKind};
use dom_cloud::DoApi;
use terminal::{Tui, restore_terminal, setup_terminal};

/// TUIを実行し、SSH接続先（`user@ip`）が選ばれた場合はそれを返す
pub async fn run(api: &dyn DoApi, ssh_user: &str) -> anyhow::Result<Option<String>> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, api, ssh_user).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut Tui,
    api: &dyn DoApi,
    ssh_user: &str,
) -> anyhow::Result<Option<String>> {
    let mut app = App::new(ssh_user);
    app.load(api).await;

    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, &app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key.code, api).await;
        }
    }

    Ok(app.ssh_target.take())
}
