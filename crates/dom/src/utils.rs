use colored::{Color, Colorize};
use std::fmt::Write as _;
use std::io::Write as _;

/// テーブルのセル（パディング後に色を付ける）
#[derive(Debug, Clone)]
pub struct Cell {
    text: String,
    color: Option<Color>,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::new(text)
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::new(text)
    }
}

/// 列幅を揃えたテキストテーブル
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<Cell>) -> &mut Self {
        self.rows.push(cells);
        self
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.text.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }

    /// ヘッダー、区切り線、各行を改行区切りで返す
    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        let header = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{:<w$}", h, w = w))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{}", header.trim_end().bold());

        let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        let _ = writeln!(out, "{}", "─".repeat(total).dimmed());

        for row in &self.rows {
            let line = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| {
                    let padded = format!("{:<w$}", cell.text, w = w);
                    match cell.color {
                        Some(color) => padded.color(color).to_string(),
                        None => padded,
                    }
                })
                .collect::<Vec<_>>()
                .join("  ");
            let _ = writeln!(out, "{}", line.trim_end());
        }
        out
    }
}

/// "$12.34"
pub fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// セクション見出し
pub fn heading(title: &str) -> String {
    title.cyan().bold().to_string()
}

/// 空の一覧（"No droplets found" など）
pub fn none_found(resources: &str) -> String {
    format!("No {} found", resources).dimmed().to_string()
}

pub fn error_line(err: impl std::fmt::Display) -> String {
    format!("{} {}", "Error:".red().bold(), err)
}

/// リソース状態の分類。CLI と TUI で色付けを共有する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Good,
    Pending,
    Bad,
    Unknown,
}

pub fn status_tone(status: &str) -> StatusTone {
    match status {
        "active" | "online" | "running" => StatusTone::Good,
        "new" | "pending" | "creating" => StatusTone::Pending,
        "off" | "archive" | "errored" | "degraded" => StatusTone::Bad,
        _ => StatusTone::Unknown,
    }
}

/// 状態に応じた色（active=緑、new=黄、それ以外=赤）
pub fn status_color(status: &str) -> Color {
    match status_tone(status) {
        StatusTone::Good => Color::Green,
        StatusTone::Pending => Color::Yellow,
        StatusTone::Bad | StatusTone::Unknown => Color::Red,
    }
}

/// [y/N] 確認プロンプト。y/yes 以外は拒否
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N]: ", prompt);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    let answer = input.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tone() {
        assert_eq!(status_tone("active"), StatusTone::Good);
        assert_eq!(status_tone("running"), StatusTone::Good);
        assert_eq!(status_tone("creating"), StatusTone::Pending);
        assert_eq!(status_tone("off"), StatusTone::Bad);
        assert_eq!(status_tone("archive"), StatusTone::Bad);
        assert_eq!(status_tone("provisioning"), StatusTone::Unknown);

        assert_eq!(status_color("new"), Color::Yellow);
        assert_eq!(status_color("provisioning"), Color::Red);
    }

    #[test]
    fn test_table_render_pads_columns() {
        colored::control::set_override(false);

        let mut table = Table::new(&["ID", "Name", "Status"]);
        table.row(vec!["1".into(), "web-1".into(), Cell::new("active").color(Color::Green)]);
        table.row(vec!["1234".into(), "db".into(), "off".into()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "ID    Name   Status");
        assert_eq!(lines[1], "─".repeat(19));
        assert_eq!(lines[2], "1     web-1  active");
        assert_eq!(lines[3], "1234  db     off");
    }

    #[test]
    fn test_money() {
        assert_eq!(money(15.0), "$15.00");
        assert_eq!(money(0.1 * 3.0), "$0.30");
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }
}
