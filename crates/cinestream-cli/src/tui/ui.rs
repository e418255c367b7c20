//! TUI rendering: navbar, page content, popups.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Flex, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};

use super::card::{Card, DetailsModal, ModalButton};
use super::state::{AppState, Focus, ModalHitAreas, Page, SectionContent};

const APP_TITLE: &str = " CineStream ";
const PLAY_LABEL: &str = "[ Play ]";
const CLOSE_LABEL: &str = "[ Close ]";

/// Draws the whole screen. Updates the scroll offset so the focused line
/// stays visible, and records the popup regions for mouse hits.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // navbar
            Constraint::Min(5),    // page content
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    let content_area = if state.page == Page::Search {
        let search_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(chunks[1]);
        draw_search_input(frame, search_chunks[0], state);
        search_chunks[1]
    } else {
        chunks[1]
    };

    draw_content(frame, content_area, state);
    // Navbar after content: its style depends on the updated scroll offset.
    draw_navbar(frame, chunks[0], state);
    draw_footer(frame, chunks[2], state);

    let screen = frame.area();
    state.modal_hits = state
        .modal
        .as_ref()
        .map(|modal| draw_modal(frame, screen, modal));
    if let Some(message) = state.alert.as_deref() {
        draw_alert(frame, screen, message);
    }
}

/// Draws the navbar. Switches to the scrolled style past the threshold.
fn draw_navbar(frame: &mut Frame, area: Rect, state: &AppState) {
    let block_style = if state.navbar_scrolled() {
        Style::default().bg(Color::Black).fg(Color::White)
    } else {
        Style::default()
    };
    let selected = Page::ALL.iter().position(|p| *p == state.page);

    let tabs = Tabs::new(
        Page::ALL
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{} {}", i.saturating_add(1), p.title())),
    )
    .select(selected)
    .highlight_style(
        Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                APP_TITLE,
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ))
            .style(block_style),
    );
    frame.render_widget(tabs, area);
}

/// Draws the search box and places the cursor while editing.
fn draw_search_input(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(search) = state.search.as_ref() else {
        return;
    };
    let style = if search.editing && !state.is_blocked() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(search.input.as_str()).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search movies and series: / "),
    );
    frame.render_widget(input, area);

    if search.editing && !state.is_blocked() {
        let typed = u16::try_from(search.input.chars().count()).unwrap_or(u16::MAX);
        frame.set_cursor_position(Position::new(
            area.x.saturating_add(1).saturating_add(typed),
            area.y.saturating_add(1),
        ));
    }
}

/// Draws the scrollable page content.
fn draw_content(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let (lines, selected) = content_lines(state);
    let height = area.height.saturating_sub(2);
    state.scroll_offset = follow_selection(state.scroll_offset, selected, height);

    let content = Paragraph::new(lines)
        .scroll((state.scroll_offset, 0))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(content, area);
}

/// Builds the content lines and the index of the focused line.
fn content_lines(state: &AppState) -> (Vec<Line<'static>>, Option<usize>) {
    let focused = state.focused();
    let mut lines = Vec::new();
    let mut selected = None;

    if let Some(hero) = state.hero.as_ref() {
        if focused == Some(Focus::Hero) {
            selected = Some(lines.len());
        }
        lines.push(Line::from(vec![
            Span::raw(marker(focused == Some(Focus::Hero))),
            Span::styled(
                hero.title.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(format!("  {}", hero.description)));
        if let Some(url) = hero.backdrop_url.as_deref() {
            lines.push(Line::styled(
                format!("  {url}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from("  [ Play ]  [ More info ]"));
        lines.push(Line::default());
    }

    for (section_idx, section) in state.sections.iter().enumerate() {
        lines.push(Line::styled(
            section.id.title(),
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ));
        match &section.content {
            SectionContent::Loading(text) => {
                lines.push(Line::styled(
                    format!("  {text}"),
                    Style::default().fg(Color::Yellow),
                ));
            }
            SectionContent::Error(text) => {
                lines.push(Line::styled(
                    format!("  {text}"),
                    Style::default().fg(Color::Red),
                ));
            }
            SectionContent::Notice(text) => {
                lines.push(Line::styled(
                    format!("  {text}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            SectionContent::Cards(cards) => {
                for (index, card) in cards.iter().enumerate() {
                    let is_focused = focused
                        == Some(Focus::Card {
                            section: section_idx,
                            index,
                        });
                    if is_focused {
                        selected = Some(lines.len());
                    }
                    lines.push(card_line(card, is_focused));
                }
            }
        }
        lines.push(Line::default());
    }

    (lines, selected)
}

fn marker(is_focused: bool) -> String {
    String::from(if is_focused { "\u{25b8} " } else { "  " })
}

/// One card: heart, title, year, rating.
fn card_line(card: &Card, is_focused: bool) -> Line<'static> {
    let (heart, heart_style) = if card.is_favorite {
        ("\u{2665}", Style::default().fg(Color::Red))
    } else {
        ("\u{2661}", Style::default().fg(Color::DarkGray))
    };
    let title_style = if is_focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::raw(marker(is_focused)),
        Span::styled(String::from(heart), heart_style),
        Span::raw(" "),
        Span::styled(card.title.clone(), title_style),
        Span::styled(
            format!("  {}  \u{2605} {}", card.year, card.rating),
            Style::default().fg(Color::Gray),
        ),
    ])
}

/// Returns the scroll offset that keeps `selected` within `height` rows.
fn follow_selection(offset: u16, selected: Option<usize>, height: u16) -> u16 {
    let Some(selected) = selected else {
        return offset;
    };
    let selected = u16::try_from(selected).unwrap_or(u16::MAX);
    if height == 0 || selected < offset {
        return selected;
    }
    let last_visible = offset.saturating_add(height).saturating_sub(1);
    if selected > last_visible {
        selected.saturating_sub(height.saturating_sub(1))
    } else {
        offset
    }
}

/// Draws the footer with key hints and the focused image URL.
fn draw_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let help_text = if state.alert.is_some() {
        String::from("Enter: OK")
    } else if state.modal.is_some() {
        String::from("Tab: switch button  Enter: press  p: play  x: close")
    } else if state.search.as_ref().is_some_and(|s| s.editing) {
        String::from("Type to search | Esc/Enter: leave input")
    } else {
        let image = state.focused_image_url().unwrap_or_default();
        format!(
            "\u{2191}\u{2193}/j/k: move  Tab: section  Enter: info  f: favorite  p: play  \
             o: open  /: search  1-3: page  q: quit  {image}"
        )
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Draws the details popup and returns its clickable regions.
fn draw_modal(frame: &mut Frame, area: Rect, modal: &DetailsModal) -> ModalHitAreas {
    let mut lines = vec![Line::styled(
        format!("\u{2605} {}", modal.rating),
        Style::default().fg(Color::Yellow),
    )];
    if let Some(tagline) = modal.tagline.as_deref() {
        lines.push(Line::styled(
            String::from(tagline),
            Style::default().add_modifier(Modifier::ITALIC),
        ));
    }
    let facts: Vec<&str> = [modal.genres.as_deref(), modal.extent.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !facts.is_empty() {
        lines.push(Line::styled(
            facts.join("  |  "),
            Style::default().fg(Color::Gray),
        ));
    }
    if let Some(url) = modal.backdrop_url.as_deref() {
        lines.push(Line::styled(
            String::from(url),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines.push(Line::default());
    lines.push(Line::from(modal.overview.clone()));

    let body_height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let popup = centered_rect(area, 70, body_height.saturating_add(8));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", modal.heading))
        .title_bottom(" x: close ");
    let inner = block.inner(popup);
    let [body, _, buttons] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);
    let [play, _, close] = Layout::horizontal([
        Constraint::Length(label_width(PLAY_LABEL)),
        Constraint::Length(2),
        Constraint::Length(label_width(CLOSE_LABEL)),
    ])
    .areas(buttons);

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), body);
    frame.render_widget(
        Paragraph::new(button(PLAY_LABEL, modal.focused == ModalButton::Play)),
        play,
    );
    frame.render_widget(
        Paragraph::new(button(CLOSE_LABEL, modal.focused == ModalButton::Close)),
        close,
    );
    ModalHitAreas { popup, play, close }
}

fn label_width(label: &str) -> u16 {
    u16::try_from(label.chars().count()).unwrap_or(u16::MAX)
}

fn button(label: &'static str, is_focused: bool) -> Span<'static> {
    if is_focused {
        Span::styled(
            label,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw(label)
    }
}

/// Draws the blocking acknowledgement.
fn draw_alert(frame: &mut Frame, area: Rect, message: &str) {
    let popup = centered_rect(area, 40, 5);
    let paragraph = Paragraph::new(vec![
        Line::from(String::from(message)),
        Line::styled("Enter: OK", Style::default().fg(Color::DarkGray)),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

/// A rectangle `width_pct` wide and `height` rows tall, centered in `area`.
fn centered_rect(area: Rect, width_pct: u16, height: u16) -> Rect {
    let [vertical] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(width_pct)])
        .flex(Flex::Center)
        .areas(vertical);
    popup
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::arithmetic_side_effects)]

    use cinestream_api::tmdb::{MediaDetails, MediaType};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::tui::state::{NAVBAR_SCROLL_THRESHOLD, SectionId};
    use crate::tui::text::ENGLISH;

    fn card(id: u64) -> Card {
        Card {
            id,
            media_type: MediaType::Movie,
            title: format!("Movie {id}"),
            year: String::from("1999"),
            rating: String::from("8.4"),
            poster_path: None,
            poster_url: format!("https://image.test/{id}.jpg"),
            is_favorite: id == 2,
        }
    }

    fn render(state: &mut AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    fn many_cards(n: u64) -> AppState {
        let mut state = AppState::for_page(Page::Favorites, &ENGLISH);
        state.set_section(
            SectionId::Favorites,
            SectionContent::Cards((1..=n).map(card).collect()),
        );
        state
    }

    #[test]
    fn test_follow_selection() {
        // Arrange & Act & Assert
        assert_eq!(follow_selection(0, Some(3), 10), 0);
        assert_eq!(follow_selection(0, Some(12), 10), 3);
        assert_eq!(follow_selection(5, Some(2), 10), 2);
        assert_eq!(follow_selection(4, None, 10), 4);
    }

    #[test]
    fn test_section_messages_render() {
        // Arrange
        let mut state = AppState::for_page(Page::Home, &ENGLISH);

        // Act
        let screen = render(&mut state, 80, 24);

        // Assert
        assert!(screen.contains("Popular Movies"));
        assert!(screen.contains("Loading..."));
        assert!(screen.contains("CineStream"));
    }

    #[test]
    fn test_single_close_button_in_modal() {
        // Arrange
        let mut state = many_cards(3);
        state.modal = Some(DetailsModal::from_details(
            &MediaDetails::default(),
            550,
            MediaType::Movie,
            &ENGLISH,
        ));

        // Act
        let screen = render(&mut state, 100, 30);

        // Assert
        assert_eq!(screen.matches("[ Close ]").count(), 1);
        assert!(screen.contains("Description not available."));
        let hits = state.modal_hits.unwrap();
        assert!(hits.popup.width > 0 && hits.popup.height > 0);
    }

    #[test]
    fn test_modal_hits_cleared_when_closed() {
        // Arrange
        let mut state = many_cards(1);
        let rect = Rect::new(1, 1, 10, 10);
        state.modal_hits = Some(ModalHitAreas {
            popup: rect,
            play: rect,
            close: rect,
        });

        // Act
        render(&mut state, 80, 24);

        // Assert
        assert!(state.modal_hits.is_none());
    }

    #[test]
    fn test_modal_button_areas_cover_labels() {
        // Arrange
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut state = many_cards(1);
        state.modal = Some(DetailsModal::from_details(
            &MediaDetails::default(),
            550,
            MediaType::Movie,
            &ENGLISH,
        ));

        // Act
        terminal.draw(|frame| draw(frame, &mut state)).unwrap();

        // Assert
        let hits = state.modal_hits.unwrap();
        let buffer = terminal.backend().buffer();
        let text_at = |rect: Rect| -> String {
            (rect.x..rect.x + rect.width)
                .map(|x| buffer[(x, rect.y)].symbol())
                .collect()
        };
        assert_eq!(text_at(hits.play), "[ Play ]");
        assert_eq!(text_at(hits.close), "[ Close ]");
        assert!(hits.popup.contains(Position::new(hits.close.x, hits.close.y)));
    }

    #[test]
    fn test_scrolls_to_keep_focus_visible() {
        // Arrange
        let mut state = many_cards(40);
        state.cursor = 30;

        // Act
        let screen = render(&mut state, 80, 24);

        // Assert
        assert!(screen.contains("Movie 31"));
        assert!(state.scroll_offset > NAVBAR_SCROLL_THRESHOLD);
        assert!(state.navbar_scrolled());
    }

    #[test]
    fn test_hearts_render() {
        // Arrange
        let mut state = many_cards(2);

        // Act
        let screen = render(&mut state, 80, 24);

        // Assert
        assert!(screen.contains("\u{2661} Movie 1"));
        assert!(screen.contains("\u{2665} Movie 2"));
    }

    #[test]
    fn test_alert_renders_over_page() {
        // Arrange
        let mut state = many_cards(1);
        state.alert = Some(String::from("Playback not implemented yet."));

        // Act
        let screen = render(&mut state, 80, 24);

        // Assert
        assert!(screen.contains("Playback not implemented yet."));
    }
}
