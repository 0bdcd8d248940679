use artforge_core::{
    ArtForgeError, CellKind, DEFAULT_SERVER, DOWNLOAD_FILENAME, DataTable, EditableGrid,
    ForgeClient, GeneratedArt,
};
use iced::widget::{button, column, container, image, row, scrollable, text, text_input};
use iced::{Element, Length, Task};
use rfd::AsyncFileDialog;
use std::path::PathBuf;

const CELL_WIDTH: f32 = 130.0;
const IMAGE_WIDTH: f32 = 500.0;
const STATUS_AUTOHIDE: tokio::time::Duration = tokio::time::Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Loading,
    Success,
    Error,
}

/// The single feedback area showing loading/success/error messages.
#[derive(Debug, Clone)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum Message {
    DataLoaded(Result<DataTable, String>),
    CellEdited {
        row: usize,
        col: usize,
        value: String,
    },
    GeneratePressed,
    ArtGenerated(Result<GeneratedArt, String>),
    ArtFetched(Result<Vec<u8>, String>),
    DownloadPressed,
    DownloadTarget(Option<PathBuf>),
    DownloadDone(Result<String, String>),
    HideStatus(u64),
}

pub struct AppState {
    client: Result<ForgeClient, String>,
    grid: Option<EditableGrid>,
    status: Option<Status>,
    // Each shown status gets a fresh sequence number; a success auto-hide
    // only fires if its number still matches, so a status shown later is
    // never hidden by a stale timer.
    status_seq: u64,
    can_generate: bool,
    is_generating: bool,
    art: Option<GeneratedArt>,
    art_handle: Option<image::Handle>,
    show_download: bool,
}

impl AppState {
    pub fn new() -> Self {
        let server =
            std::env::var("ARTFORGE_SERVER").unwrap_or_else(|_| DEFAULT_SERVER.to_string());
        Self {
            client: ForgeClient::new(&server).map_err(|e| e.to_string()),
            grid: None,
            status: None,
            status_seq: 0,
            can_generate: false,
            is_generating: false,
            art: None,
            art_handle: None,
            show_download: false,
        }
    }

    fn show_status(&mut self, kind: StatusKind, message: String) -> Task<Message> {
        self.status_seq += 1;
        let seq = self.status_seq;
        self.status = Some(Status { kind, message });

        // Only success statuses auto-hide; loading and error stay until
        // replaced by a later call.
        if kind == StatusKind::Success {
            Task::perform(
                async move {
                    tokio::time::sleep(STATUS_AUTOHIDE).await;
                    seq
                },
                Message::HideStatus,
            )
        } else {
            Task::none()
        }
    }
}

pub fn initialize() -> (AppState, Task<Message>) {
    let mut state = AppState::new();

    let client = match state.client.clone() {
        Ok(client) => client,
        Err(e) => {
            let task =
                state.show_status(StatusKind::Error, format!("Failed to set up HTTP client: {}", e));
            return (state, task);
        }
    };

    // Load exactly once, as soon as the view is up. There is no retry; a
    // failed load leaves the grid empty until the app is restarted.
    let load_task = Task::perform(
        async move { client.load_data().await.map_err(|e| e.to_string()) },
        Message::DataLoaded,
    );
    let status_task = state.show_status(StatusKind::Loading, "Loading data...".to_string());

    (state, Task::batch(vec![status_task, load_task]))
}

pub fn update(state: &mut AppState, message: Message) -> Task<Message> {
    match message {
        Message::DataLoaded(result) => match result {
            Ok(table) => {
                let row_count = table.row_count();
                state.grid = Some(EditableGrid::render(&table));
                state.can_generate = true;
                log::debug!("loaded {} rows, {} columns", row_count, table.columns.len());
                return state.show_status(
                    StatusKind::Success,
                    format!("Loaded {} rows successfully", row_count),
                );
            }
            Err(e) => {
                return state
                    .show_status(StatusKind::Error, format!("Failed to load data: {}", e));
            }
        },
        Message::CellEdited { row, col, value } => {
            if let Some(grid) = state.grid.as_mut() {
                let numeric = grid
                    .cell(row, col)
                    .map(|cell| cell.kind == CellKind::Numeric)
                    .unwrap_or(false);
                if !numeric || acceptable_numeric_entry(&value) {
                    grid.set_cell(row, col, value);
                }
            }
        }
        Message::GeneratePressed => {
            // Mutual exclusion is enforced here as well as by the disabled
            // button: a press while a request is in flight is a no-op.
            if state.is_generating || !state.can_generate {
                return Task::none();
            }
            let Some(grid) = state.grid.as_ref() else {
                return Task::none();
            };
            let client = match &state.client {
                Ok(client) => client.clone(),
                Err(_) => return Task::none(),
            };

            // Collect synchronously so the request observes every edit
            // committed up to the moment of the click.
            let rows = grid.collect();
            state.is_generating = true;

            let status_task =
                state.show_status(StatusKind::Loading, "Generating art...".to_string());
            let generate_task = Task::perform(
                async move { client.generate_art(rows).await.map_err(describe_generate) },
                Message::ArtGenerated,
            );
            return Task::batch(vec![status_task, generate_task]);
        }
        Message::ArtGenerated(result) => {
            // The control is restored on every exit path, success and
            // failure alike.
            state.is_generating = false;

            match result {
                Ok(art) => {
                    state.show_download = true;
                    let message = art.message.clone();
                    let image_url = art.image_url.clone();
                    state.art = Some(art);

                    let status_task = state.show_status(StatusKind::Success, message);
                    let fetch_task = match &state.client {
                        Ok(client) => {
                            let client = client.clone();
                            Task::perform(
                                async move {
                                    client.fetch_image(&image_url).await.map_err(|e| e.to_string())
                                },
                                Message::ArtFetched,
                            )
                        }
                        Err(_) => Task::none(),
                    };
                    return Task::batch(vec![status_task, fetch_task]);
                }
                Err(e) => {
                    return state.show_status(StatusKind::Error, e);
                }
            }
        }
        Message::ArtFetched(result) => match result {
            Ok(bytes) => {
                state.art_handle = Some(image::Handle::from_bytes(bytes));
            }
            Err(e) => {
                return state
                    .show_status(StatusKind::Error, format!("Failed to fetch image: {}", e));
            }
        },
        Message::DownloadPressed => {
            let status_task =
                state.show_status(StatusKind::Success, "Download started...".to_string());
            let dialog_task = Task::perform(
                async {
                    AsyncFileDialog::new()
                        .set_file_name(DOWNLOAD_FILENAME)
                        .add_filter("PNG Images", &["png"])
                        .save_file()
                        .await
                        .map(|handle| handle.path().to_path_buf())
                },
                Message::DownloadTarget,
            );
            return Task::batch(vec![status_task, dialog_task]);
        }
        Message::DownloadTarget(target) => match target {
            Some(path) => {
                let client = match &state.client {
                    Ok(client) => client.clone(),
                    Err(_) => return Task::none(),
                };
                return Task::perform(
                    async move {
                        client
                            .download_image(&path)
                            .await
                            .map(|_| path.display().to_string())
                            .map_err(|e| e.to_string())
                    },
                    Message::DownloadDone,
                );
            }
            None => {
                return state
                    .show_status(StatusKind::Success, "Download cancelled".to_string());
            }
        },
        Message::DownloadDone(result) => match result {
            Ok(path) => {
                return state
                    .show_status(StatusKind::Success, format!("Image saved to {}", path));
            }
            Err(e) => {
                return state
                    .show_status(StatusKind::Error, format!("Download failed: {}", e));
            }
        },
        Message::HideStatus(seq) => {
            if seq == state.status_seq {
                state.status = None;
            }
        }
    }
    Task::none()
}

/// Error text for the generate flow: backend-reported failures surface
/// verbatim, transport/parse failures get a generic prefix.
fn describe_generate(err: ArtForgeError) -> String {
    match err {
        ArtForgeError::Backend(msg) => format!("Error: {}", msg),
        other => format!("Generation failed: {}", other),
    }
}

/// Characters a decimal-entry cell will accept while typing. Collection
/// still parses; a partial entry like "-" or "1e" collects as NaN.
fn acceptable_numeric_entry(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}

pub fn view(state: &AppState) -> Element<Message> {
    let status_banner: Element<Message> = match &state.status {
        Some(status) => {
            let (bg, fg) = match status.kind {
                StatusKind::Loading => (
                    iced::Color::from_rgb(0.90, 0.94, 1.0),
                    iced::Color::from_rgb(0.10, 0.25, 0.55),
                ),
                StatusKind::Success => (
                    iced::Color::from_rgb(0.88, 0.97, 0.88),
                    iced::Color::from_rgb(0.10, 0.45, 0.15),
                ),
                StatusKind::Error => (
                    iced::Color::from_rgb(1.0, 0.90, 0.90),
                    iced::Color::from_rgb(0.60, 0.10, 0.10),
                ),
            };
            container(text(&status.message).size(14).color(fg))
                .style(move |_theme| container::Style {
                    background: Some(bg.into()),
                    border: iced::Border {
                        color: fg,
                        width: 1.0,
                        radius: 4.0.into(),
                    },
                    ..Default::default()
                })
                .padding(8)
                .width(Length::Fill)
                .into()
        }
        None => row![].into(),
    };

    let table_section: Element<Message> = match &state.grid {
        Some(grid) => {
            let header = row(grid
                .columns
                .iter()
                .map(|name| text(name.clone()).size(14).width(Length::Fixed(CELL_WIDTH)).into())
                .collect::<Vec<Element<Message>>>())
            .spacing(5);

            let mut body = Vec::new();
            for (row_index, cells) in grid.rows().enumerate() {
                let inputs = cells
                    .iter()
                    .enumerate()
                    .map(|(col_index, cell)| {
                        text_input("", &cell.buffer)
                            .on_input(move |value| Message::CellEdited {
                                row: row_index,
                                col: col_index,
                                value,
                            })
                            .size(14)
                            .width(Length::Fixed(CELL_WIDTH))
                            .into()
                    })
                    .collect::<Vec<Element<Message>>>();
                body.push(row(inputs).spacing(5).into());
            }

            column![
                header,
                scrollable(column(body).spacing(3)).height(Length::Fixed(320.0)),
            ]
            .spacing(8)
            .into()
        }
        None => text("No data loaded yet").size(14).into(),
    };

    let generate_button = button(if state.is_generating {
        "Generating..."
    } else {
        "Generate Art"
    })
    .on_press_maybe(if state.is_generating || !state.can_generate {
        None
    } else {
        Some(Message::GeneratePressed)
    })
    .padding(10);

    let download_button: Element<Message> = if state.show_download {
        button("Download Image")
            .on_press(Message::DownloadPressed)
            .padding(10)
            .into()
    } else {
        row![].into()
    };

    let image_section: Element<Message> = match &state.art_handle {
        Some(handle) => image::Image::<image::Handle>::new(handle.clone())
            .width(Length::Fixed(IMAGE_WIDTH))
            .into(),
        None => {
            if state.art.is_some() {
                text("Loading image...").size(14).into()
            } else {
                row![].into()
            }
        }
    };

    let content = column![
        text("Art Forge").size(24),
        status_banner,
        table_section,
        row![generate_button, download_button].spacing(10),
        image_section,
    ]
    .spacing(15)
    .padding(20);

    scrollable(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
