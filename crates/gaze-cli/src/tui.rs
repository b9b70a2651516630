use std::io::{Stdout, stdout};
use std::path::PathBuf;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use gaze_engine::{
    Diagnostic, FileTree, FileTreeItem, ParseOptions, SceneParser, SceneTree, TreeItem, io,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use relative_path::RelativePathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Files,
    Scene,
}

struct OpenScene {
    tree: SceneTree,
    rows: Vec<TreeItem>,
    diagnostics: Vec<Diagnostic>,
}

pub struct App {
    project_path: PathBuf,
    parser: SceneParser,
    file_tree: FileTree,
    tree_items: Vec<FileTreeItem>,
    file_list_state: ListState,
    scene: Option<OpenScene>,
    scene_list_state: ListState,
    status: Vec<String>,
    focus: Focus,
}

impl App {
    pub fn new(project_path: PathBuf, options: ParseOptions) -> Result<Self> {
        let file_tree = io::build_file_tree(&project_path)?;
        let tree_items = file_tree.get_items();

        let mut app = Self {
            project_path,
            parser: SceneParser::with_options(options),
            file_tree,
            tree_items,
            file_list_state: ListState::default(),
            scene: None,
            scene_list_state: ListState::default(),
            status: Vec::new(),
            focus: Focus::Files,
        };

        if !app.tree_items.is_empty() {
            app.file_list_state.select(Some(0));
            app.update_scene_for_selection();
        }

        Ok(app)
    }

    fn step(state: &mut ListState, len: usize, forward: bool) {
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) if forward => (i + 1) % len,
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        state.select(Some(i));
    }

    fn next(&mut self) {
        self.move_selection(true);
    }

    fn previous(&mut self) {
        self.move_selection(false);
    }

    fn move_selection(&mut self, forward: bool) {
        match self.focus {
            Focus::Files => {
                Self::step(&mut self.file_list_state, self.tree_items.len(), forward);
                self.update_scene_for_selection();
            }
            Focus::Scene => {
                let len = self.scene.as_ref().map_or(0, |s| s.rows.len());
                Self::step(&mut self.scene_list_state, len, forward);
            }
        }
    }

    fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Files if self.scene.is_some() => Focus::Scene,
            _ => Focus::Files,
        };
    }

    fn selected_file(&self) -> Option<&FileTreeItem> {
        self.file_list_state
            .selected()
            .and_then(|index| self.tree_items.get(index))
    }

    fn update_scene_for_selection(&mut self) {
        let Some(item) = self.selected_file() else {
            return;
        };

        if item.node.is_folder {
            self.status = vec![
                format!("📁 {}", item.node.name),
                String::new(),
                "Press Enter/Space to toggle, → to expand, ← to collapse".to_string(),
            ];
            self.scene = None;
            return;
        }

        let Some(file) = item.node.scene_file.clone() else {
            return;
        };
        self.scene = None;
        self.scene_list_state.select(None);

        match io::load_scene(file.relative_path(), &self.project_path, &self.parser) {
            Ok(parsed) => match parsed.tree {
                Some(tree) => {
                    let rows = tree.iter().collect();
                    self.status = vec![file.resource_path()];
                    self.scene = Some(OpenScene {
                        tree,
                        rows,
                        diagnostics: parsed.diagnostics,
                    });
                    self.scene_list_state.select(Some(0));
                }
                None => {
                    self.status = vec![format!("{} declares no nodes", file.resource_path())];
                }
            },
            Err(e) => {
                log::debug!("failed to load {}: {e}", file.relative_path());
                self.status = vec![format!("Error loading scene: {e}")];
            }
        }
    }

    fn selected_folder_path(&self) -> Option<RelativePathBuf> {
        self.selected_file()
            .filter(|item| item.node.is_folder)
            .map(|item| item.node.relative_path.clone())
    }

    fn activate_selected_item(&mut self) {
        if self.focus != Focus::Files {
            return;
        }
        if let Some(path) = self.selected_folder_path() {
            self.file_tree.toggle_folder(&path);
            self.refresh_items();
        }
    }

    fn expand_selected_folder(&mut self) {
        if let Some(path) = self.selected_folder_path() {
            self.file_tree.expand_folder(&path);
            self.refresh_items();
        }
    }

    fn collapse_selected_folder(&mut self) {
        if let Some(path) = self.selected_folder_path() {
            self.file_tree.collapse_folder(&path);
            self.refresh_items();
        }
    }

    fn refresh_items(&mut self) {
        self.tree_items = self.file_tree.get_items();
        self.update_scene_for_selection();
    }

    /// Lines for the inspector pane: the selected node, then diagnostics.
    fn inspector_lines(&self) -> Vec<String> {
        let Some(scene) = &self.scene else {
            return self.status.clone();
        };

        let mut lines = self.status.clone();
        lines.push(String::new());

        let selected = self
            .scene_list_state
            .selected()
            .and_then(|index| scene.rows.get(index));
        if let Some(row) = selected {
            let node = &scene.tree[row.id];
            lines.push(format!("{} ({})", node.name, node.kind));
            if let Some(path) = scene.tree.path_of(row.id) {
                lines.push(format!("path: {path}"));
            }
            if let Some(parent_ref) = &node.parent_ref {
                lines.push(format!("parent: {parent_ref}"));
            }
            lines.push(String::new());
            if node.properties.is_empty() {
                lines.push("(no properties)".to_string());
            }
            for (key, value) in &node.properties {
                lines.push(format!("{key} = {value}"));
            }
        }

        if !scene.diagnostics.is_empty() {
            lines.push(String::new());
            lines.push(format!("{} findings:", scene.diagnostics.len()));
            lines.extend(scene.diagnostics.iter().map(|d| format!("  {d}")));
        }

        lines
    }
}

pub fn run(project_path: PathBuf, options: ParseOptions) -> Result<()> {
    let mut app = App::new(project_path, options)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Tab => app.switch_focus(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Enter | KeyCode::Char(' ') => app.activate_selected_item(),
                KeyCode::Right => app.expand_selected_folder(),
                KeyCode::Left => app.collapse_selected_folder(),
                _ => {}
            }
        }
    }
}

fn pane(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(35),
            Constraint::Percentage(35),
        ])
        .split(rows[0]);

    let highlight = Style::default().bg(Color::Yellow).fg(Color::Black);

    // Files
    let file_items: Vec<ListItem> = app
        .tree_items
        .iter()
        .map(|item| {
            let indent = "  ".repeat(item.depth);
            let icon = match (item.node.is_folder, item.node.is_expanded) {
                (true, true) => "📂 ",
                (true, false) => "📁 ",
                (false, _) => "🎬 ",
            };
            ListItem::new(Line::from(format!("{indent}{icon}{}", item.node.name)))
        })
        .collect();
    let files_list = List::new(file_items)
        .block(pane("Scenes", app.focus == Focus::Files))
        .highlight_style(highlight);
    f.render_stateful_widget(files_list, chunks[0], &mut app.file_list_state);

    // Scene tree
    let node_items: Vec<ListItem> = app
        .scene
        .as_ref()
        .map(|scene| {
            scene
                .rows
                .iter()
                .map(|row| {
                    let node = &scene.tree[row.id];
                    ListItem::new(Line::from(vec![
                        Span::raw("  ".repeat(row.depth)),
                        Span::styled(node.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                        Span::styled(format!(" {}", node.kind), Style::default().fg(Color::DarkGray)),
                    ]))
                })
                .collect()
        })
        .unwrap_or_default();
    let nodes_list = List::new(node_items)
        .block(pane("Tree", app.focus == Focus::Scene))
        .highlight_style(highlight);
    f.render_stateful_widget(nodes_list, chunks[1], &mut app.scene_list_state);

    // Inspector
    let inspector_text: Vec<Line> = match app.inspector_lines() {
        lines if lines.is_empty() => vec![Line::from("Select a scene to inspect it")],
        lines => lines.into_iter().map(Line::from).collect(),
    };
    let inspector = Paragraph::new(inspector_text)
        .block(pane("Inspector", false))
        .wrap(Wrap { trim: false });
    f.render_widget(inspector, chunks[2]);

    let help = Paragraph::new(Line::from(
        "q: Quit | Tab: Switch pane | ↑/k ↓/j: Move | Enter/Space: Toggle | →: Expand | ←: Collapse",
    ));
    f.render_widget(help, rows[1]);
}
