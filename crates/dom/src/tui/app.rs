//! TUIの状態遷移

use crossterm::event::KeyCode;
use dom_cloud::{DoApi, Droplet, DropletAction, PLACEHOLDER};

/// 一覧ビュー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Droplets,
    Volumes,
    Domains,
    Firewalls,
    Databases,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Droplets,
        View::Volumes,
        View::Domains,
        View::Firewalls,
        View::Databases,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            View::Droplets => "Droplets",
            View::Volumes => "Volumes",
            View::Domains => "Domains",
            View::Firewalls => "Firewalls",
            View::Databases => "Databases",
        }
    }

    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            View::Droplets => &["ID", "Name", "Region", "Size", "IP", "Status"],
            View::Volumes => &["ID", "Name", "Size (GB)", "Region", "Attached To"],
            View::Domains => &["Name", "TTL"],
            View::Firewalls => &["Name", "ID", "Status", "Droplets"],
            View::Databases => &["Name", "Engine", "Size", "Region", "Status"],
        }
    }

    fn index(&self) -> usize {
        View::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn next(&self) -> View {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    pub fn previous(&self) -> View {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }

    fn from_key(c: char) -> Option<View> {
        match c {
            'd' => Some(View::Droplets),
            'v' => Some(View::Volumes),
            'o' => Some(View::Domains),
            'f' => Some(View::Firewalls),
            'b' => Some(View::Databases),
            _ => None,
        }
    }
}

/// 一覧か、ドロップレット詳細か
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    /// `droplets` 内のインデックス
    Detail(usize),
}

pub struct App {
    pub view: View,
    pub screen: Screen,
    pub rows: Vec<Vec<String>>,
    pub selected: usize,
    pub status: String,
    pub should_quit: bool,
    pub ssh_target: Option<String>,
    droplets: Vec<Droplet>,
    pending: Option<DropletAction>,
    ssh_user: String,
}

impl App {
    pub fn new(ssh_user: &str) -> Self {
        Self {
            view: View::Droplets,
            screen: Screen::List,
            rows: Vec::new(),
            selected: 0,
            status: String::new(),
            should_quit: false,
            ssh_target: None,
            droplets: Vec::new(),
            pending: None,
            ssh_user: ssh_user.to_string(),
        }
    }

    /// 詳細画面で表示中のドロップレット
    pub fn detail(&self) -> Option<&Droplet> {
        match self.screen {
            Screen::Detail(i) => self.droplets.get(i),
            Screen::List => None,
        }
    }

    /// 現在のビューを取得し直して行を置き換える
    pub async fn load(&mut self, api: &dyn DoApi) {
        self.rows.clear();
        self.selected = 0;

        match self.fetch_rows(api).await {
            Ok(rows) => {
                self.status = format!("{} {}", rows.len(), self.view.title().to_lowercase());
                self.rows = rows;
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", self.view.title(), e);
                self.droplets.clear();
                self.status = format!("Error: {}", e);
            }
        }
    }

    async fn fetch_rows(&mut self, api: &dyn DoApi) -> dom_cloud::Result<Vec<Vec<String>>> {
        let rows = match self.view {
            View::Droplets => {
                self.droplets = api.list_droplets(None).await?;
                self.droplets
                    .iter()
                    .map(|d| {
                        vec![
                            d.id.to_string(),
                            d.name.clone(),
                            d.region_slug().to_string(),
                            d.size_slug.clone(),
                            d.first_ipv4().unwrap_or(PLACEHOLDER).to_string(),
                            d.status.to_string(),
                        ]
                    })
                    .collect()
            }
            View::Volumes => api
                .list_volumes()
                .await?
                .iter()
                .map(|v| {
                    vec![
                        v.id.clone(),
                        v.name.clone(),
                        v.size_gigabytes.to_string(),
                        v.region_slug().to_string(),
                        v.attached_label(),
                    ]
                })
                .collect(),
            View::Domains => api
                .list_domains()
                .await?
                .iter()
                .map(|d| {
                    vec![
                        d.name.clone(),
                        d.ttl.map_or_else(|| PLACEHOLDER.to_string(), |t| t.to_string()),
                    ]
                })
                .collect(),
            View::Firewalls => api
                .list_firewalls()
                .await?
                .iter()
                .map(|f| {
                    vec![
                        f.name.clone(),
                        f.id.clone(),
                        f.status.clone(),
                        f.droplet_ids.len().to_string(),
                    ]
                })
                .collect(),
            View::Databases => api
                .list_database_clusters()
                .await?
                .iter()
                .map(|db| {
                    vec![
                        db.name.clone(),
                        db.engine_label(),
                        db.size.clone(),
                        db.region.clone(),
                        db.status.clone(),
                    ]
                })
                .collect(),
        };
        Ok(rows)
    }

    pub async fn handle_key(&mut self, code: KeyCode, api: &dyn DoApi) {
        if let Some(action) = self.pending.take() {
            self.answer_confirmation(code, action, api).await;
            return;
        }

        match self.screen {
            Screen::List => self.handle_list_key(code, api).await,
            Screen::Detail(_) => self.handle_detail_key(code),
        }
    }

    async fn handle_list_key(&mut self, code: KeyCode, api: &dyn DoApi) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('r') => self.load(api).await,
            KeyCode::Tab => self.switch_view(self.view.next(), api).await,
            KeyCode::BackTab => self.switch_view(self.view.previous(), api).await,
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.rows.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Enter => {
                if self.view == View::Droplets && self.selected < self.droplets.len() {
                    self.screen = Screen::Detail(self.selected);
                }
            }
            KeyCode::Char(c) => {
                if let Some(view) = View::from_key(c) {
                    self.switch_view(view, api).await;
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, code: KeyCode) {
        let Some(droplet) = self.detail() else {
            self.screen = Screen::List;
            return;
        };
        let public_ip = droplet.public_ipv4().map(str::to_string);
        let name = droplet.name.clone();

        match code {
            KeyCode::Esc => self.screen = Screen::List,
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('s') => match public_ip {
                Some(ip) => {
                    self.ssh_target = Some(format!("{}@{}", self.ssh_user, ip));
                    self.should_quit = true;
                }
                None => self.status = format!("{} has no public IP address", name),
            },
            KeyCode::Char('R') => self.ask(DropletAction::Reboot),
            KeyCode::Char('P') => self.ask(DropletAction::PowerOff),
            KeyCode::Char('O') => self.ask(DropletAction::PowerOn),
            _ => {}
        }
    }

    fn ask(&mut self, action: DropletAction) {
        if let Some(name) = self.detail().map(|d| d.name.clone()) {
            self.status = format!("{} {}? (y/n)", action.label(), name);
            self.pending = Some(action);
        }
    }

    async fn answer_confirmation(&mut self, code: KeyCode, action: DropletAction, api: &dyn DoApi) {
        let Some(droplet) = self.detail() else {
            return;
        };
        let (id, name) = (droplet.id, droplet.name.clone());

        if code != KeyCode::Char('y') {
            self.status = "Cancelled".to_string();
            return;
        }

        self.status = match api.droplet_action(id, action).await {
            Ok(()) => {
                tracing::info!("{} requested for droplet {}", action.as_str(), id);
                format!("{} requested for {}", action.label(), name)
            }
            Err(e) => format!("Error: {}", e),
        };
    }

    async fn switch_view(&mut self, view: View, api: &dyn DoApi) {
        self.view = view;
        self.load(api).await;
    }
}

/// 詳細画面の項目（ラベル, 値）
pub fn detail_fields(droplet: &Droplet) -> Vec<(&'static str, String)> {
    let ip = |ip: Option<&str>| ip.unwrap_or(PLACEHOLDER).to_string();
    vec![
        ("Name", droplet.name.clone()),
        ("ID", droplet.id.to_string()),
        ("Status", droplet.status.to_string()),
        (
            "Region",
            format!("{} ({})", droplet.region_slug(), droplet.region_name()),
        ),
        ("Size", droplet.size_slug.clone()),
        ("vCPUs", droplet.vcpus.to_string()),
        ("Memory", format!("{} MB", droplet.memory)),
        ("Disk", format!("{} GB", droplet.disk)),
        ("Image", droplet.image_label().to_string()),
        ("Public IP", ip(droplet.public_ipv4())),
        ("Private IP", ip(droplet.private_ipv4())),
        ("Tags", droplet.tags_label()),
        ("Created", droplet.created_date().to_string()),
    ]
}
