//! Main application state and rendering

use crate::data::{Question, ANSWERS_PER_QUESTION};
use crate::game::scoring::QUESTION_SECONDS;
use crate::game::{Game, GamePhase, CARD_COUNT};
use crate::tui::widgets::{CardBack, CountdownBar, NoticeLine};
use crate::tui::{centered_rect, countdown_color, styled_block, Theme, ToastQueue};
use crate::tui::{create_content_layout, create_main_layout, create_question_layout};
use crate::tui::{HELP_TEXT, LOGO, RULES, SMALL_LOGO};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::time::{Duration, Instant};

/// Application state
pub struct App {
    pub game: Game<ToastQueue>,
    pub theme: Theme,
    pub running: bool,
    pub show_help: bool,
    pub card_cursor: usize,
    pub answer_state: ListState,
    pub status_message: Option<String>,
    tick_rate: Duration,
}

impl App {
    pub fn new(game: Game<ToastQueue>, tick_rate: Duration) -> Self {
        let mut answer_state = ListState::default();
        answer_state.select(Some(0));

        Self {
            game,
            theme: Theme::default(),
            running: true,
            show_help: false,
            card_cursor: 0,
            answer_state,
            status_message: None,
            tick_rate,
        }
    }

    /// Wait up to one tick for a key, then advance the game clock.
    /// Returns false once the player has quit.
    pub fn handle_input(&mut self) -> std::io::Result<bool> {
        if event::poll(self.tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        self.on_tick();
        Ok(self.running)
    }

    pub fn on_tick(&mut self) {
        self.game.tick();
        self.game.notifier_mut().prune(Instant::now());
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => {
                self.running = false;
                return;
            }
            KeyCode::Char('?') => {
                self.show_help = !self.show_help;
                return;
            }
            KeyCode::Esc if self.show_help => {
                self.show_help = false;
                return;
            }
            _ => {}
        }
        if self.show_help {
            return;
        }

        match self.game.phase() {
            GamePhase::Start => self.handle_start_key(code),
            GamePhase::CardSelection => self.handle_card_key(code),
            GamePhase::Question => self.handle_question_key(code),
            GamePhase::Answers => self.handle_answer_key(code),
            GamePhase::Finished => self.handle_finished_key(code),
        }
    }

    fn handle_start_key(&mut self, code: KeyCode) {
        if matches!(code, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('s')) {
            match self.game.start_game() {
                Ok(()) => {
                    self.status_message = None;
                    self.card_cursor = 0;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "could not start game");
                    self.status_message = Some(e.to_string());
                }
            }
        }
    }

    fn handle_card_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => self.card_cursor = self.card_cursor.saturating_sub(1),
            KeyCode::Right => self.card_cursor = (self.card_cursor + 1).min(CARD_COUNT - 1),
            KeyCode::Enter | KeyCode::Char(' ') => self.pick_card(self.card_cursor),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < CARD_COUNT {
                    self.pick_card(index);
                }
            }
            _ => {}
        }
    }

    fn pick_card(&mut self, index: usize) {
        self.card_cursor = index;
        self.answer_state.select(Some(0));
        self.game.select_card(index);
    }

    fn handle_question_key(&mut self, code: KeyCode) {
        if matches!(code, KeyCode::Enter | KeyCode::Char(' ')) {
            self.game.reveal_answers();
        }
    }

    fn handle_answer_key(&mut self, code: KeyCode) {
        let selected = self.answer_state.selected().unwrap_or(0);
        match code {
            KeyCode::Up => self.answer_state.select(Some(selected.saturating_sub(1))),
            KeyCode::Down => {
                self.answer_state.select(Some((selected + 1).min(ANSWERS_PER_QUESTION - 1)))
            }
            KeyCode::Enter => self.game.select_answer(selected),
            KeyCode::Char(c) => {
                let index = match c.to_ascii_lowercase() {
                    l @ 'a'..='d' => Some(l as usize - 'a' as usize),
                    d @ '1'..='4' => Some(d as usize - '1' as usize),
                    _ => None,
                };
                if let Some(index) = index {
                    self.answer_state.select(Some(index));
                    self.game.select_answer(index);
                }
            }
            _ => {}
        }
    }

    fn handle_finished_key(&mut self, code: KeyCode) {
        if matches!(code, KeyCode::Enter | KeyCode::Char('r')) {
            self.game.reset_game();
            self.game.notifier_mut().clear();
            self.card_cursor = 0;
            self.answer_state.select(Some(0));
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        match self.game.phase() {
            GamePhase::Start => self.render_start(frame),
            GamePhase::Finished => self.render_finished(frame),
            GamePhase::CardSelection | GamePhase::Question | GamePhase::Answers => {
                self.render_table(frame)
            }
        }

        self.render_toasts(frame);

        // Overlay help if showing
        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    fn render_start(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default().style(Style::default().bg(self.theme.bg)),
            area,
        );

        let rules_height = RULES.len() as u16 + 2;
        // Skip the big logo on small terminals
        let logo_height = if area.height < 24 { 1 } else { LOGO.lines().count() as u16 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(logo_height),
                Constraint::Length(1),
                Constraint::Length(rules_height),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(area);

        let logo = if logo_height == 1 { "═══ UNO QUIZ ═══" } else { LOGO };
        frame.render_widget(
            Paragraph::new(logo)
                .style(Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center),
            chunks[0],
        );
        frame.render_widget(
            Paragraph::new("Pick a card, answer the question, collect points!")
                .style(Style::default().fg(self.theme.header))
                .alignment(Alignment::Center),
            chunks[1],
        );

        let rules: Vec<Line> = RULES.iter().map(|r| Line::from(*r)).collect();
        let rules_area = centered_rect(64, rules_height, chunks[2]);
        frame.render_widget(
            Paragraph::new(rules).block(styled_block("How to play", &self.theme)),
            rules_area,
        );

        let prompt = match &self.status_message {
            Some(msg) => Line::from(Span::styled(msg.clone(), Style::default().fg(self.theme.alert))),
            None => Line::from(Span::styled(
                "Press Enter to play!",
                Style::default().fg(self.theme.success).add_modifier(Modifier::BOLD),
            )),
        };
        frame.render_widget(
            Paragraph::new(vec![Line::from(""), prompt]).alignment(Alignment::Center),
            chunks[3],
        );

        if area.height > 1 {
            let footer = Paragraph::new("Press ? for help | q to quit")
                .style(Style::default().fg(self.theme.border))
                .alignment(Alignment::Center);
            frame.render_widget(footer, Rect::new(0, area.height - 1, area.width, 1));
        }
    }

    fn render_table(&mut self, frame: &mut Frame) {
        let layout = create_main_layout(frame.area());

        self.render_header(frame, layout[0]);

        let content = create_content_layout(layout[1]);
        match self.game.phase() {
            GamePhase::CardSelection => self.render_cards(frame, content[0]),
            GamePhase::Question => self.render_question(frame, content[0]),
            _ => self.render_answers(frame, content[0]),
        }
        self.render_score_panel(frame, content[1]);

        self.render_status_bar(frame, layout[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let header_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(14),
                Constraint::Min(20),
                Constraint::Length(16),
            ])
            .split(area);

        let border = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border));

        let logo = Paragraph::new(SMALL_LOGO)
            .style(Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD))
            .block(border.clone());
        frame.render_widget(logo, header_layout[0]);

        let state = self.game.state();
        let title = Paragraph::new(format!(
            "Question {} of {}",
            state.current_question_index + 1,
            state.questions.len()
        ))
        .style(Style::default().fg(self.theme.warning))
        .alignment(Alignment::Center)
        .block(border.clone());
        frame.render_widget(title, header_layout[1]);

        let score = Paragraph::new(format!(" Score {} ", state.score))
            .style(Style::default().fg(self.theme.fg))
            .alignment(Alignment::Right)
            .block(border);
        frame.render_widget(score, header_layout[2]);
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let block = styled_block("Pick your card!", &self.theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(5), Constraint::Length(1)])
            .split(inner);

        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, CARD_COUNT as u32); CARD_COUNT])
            .split(rows[1]);

        for (i, slot) in cards.iter().enumerate() {
            let card_area = centered_rect(14, 9, *slot);
            let color = self.theme.card_colors[i % self.theme.card_colors.len()];
            frame.render_widget(
                CardBack::new(i + 1).color(color).highlighted(i == self.card_cursor),
                card_area,
            );
        }

        frame.render_widget(
            Paragraph::new("←/→ to choose, Enter or 1-3 to pick")
                .style(Style::default().fg(self.theme.border))
                .alignment(Alignment::Center),
            rows[2],
        );
    }

    fn render_countdown(&self, frame: &mut Frame, area: Rect) {
        let left = self.game.time_left();
        frame.render_widget(
            CountdownBar::new(left, QUESTION_SECONDS).color(countdown_color(left, &self.theme)),
            area,
        );
    }

    fn render_prompt(&self, frame: &mut Frame, area: Rect, question: &Question) {
        let title = format!("Question {}", self.game.state().current_question_index + 1);
        frame.render_widget(
            Paragraph::new(question.question.as_str())
                .style(Style::default().fg(self.theme.fg).add_modifier(Modifier::BOLD))
                .wrap(Wrap { trim: true })
                .block(styled_block(&title, &self.theme)),
            area,
        );
    }

    fn render_question(&self, frame: &mut Frame, area: Rect) {
        let Some(question) = self.game.state().current_question() else {
            return;
        };
        let chunks = create_question_layout(area);

        self.render_countdown(frame, chunks[0]);
        self.render_prompt(frame, chunks[1], question);
        frame.render_widget(
            Paragraph::new("Press Enter to see the answers")
                .style(Style::default().fg(self.theme.success))
                .alignment(Alignment::Center),
            chunks[2],
        );
    }

    fn render_answers(&mut self, frame: &mut Frame, area: Rect) {
        let Some(question) = self.game.state().current_question().cloned() else {
            return;
        };
        let chunks = create_question_layout(area);

        self.render_countdown(frame, chunks[0]);
        self.render_prompt(frame, chunks[1], &question);

        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(chunks[2]);

        let items: Vec<ListItem> = question
            .answers
            .iter()
            .enumerate()
            .map(|(i, answer)| ListItem::new(format!("{}. {}", Question::answer_label(i), answer)))
            .collect();
        let list = List::new(items)
            .block(styled_block("Answers", &self.theme))
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            )
            .highlight_symbol("→ ");
        frame.render_stateful_widget(list, parts[0], &mut self.answer_state);

        let state = self.game.state();
        let footer = if state.is_resolved() {
            Line::from(Span::styled("Next card coming up...", Style::default().fg(self.theme.success)))
        } else if state.wrong_attempts > 0 {
            Line::from(Span::styled(
                format!("Wrong {} time(s). Points will be reduced!", state.wrong_attempts),
                Style::default().fg(self.theme.alert),
            ))
        } else {
            Line::from(Span::styled("A-D or Enter to answer", Style::default().fg(self.theme.border)))
        };
        frame.render_widget(Paragraph::new(footer).alignment(Alignment::Center), parts[1]);
    }

    fn render_score_panel(&self, frame: &mut Frame, area: Rect) {
        let state = self.game.state();
        let mut text = vec![
            Line::from(Span::styled(
                state.score.to_string(),
                Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD),
            )),
            Line::from("Total points"),
            Line::from(Span::styled(
                format!("Question {} of {}", state.current_question_index + 1, state.questions.len()),
                Style::default().fg(self.theme.warning),
            )),
        ];

        if let Some(breakdown) = self.game.last_breakdown() {
            text.push(Line::from(""));
            for (label, value) in breakdown.lines() {
                let color = if value.starts_with('-') { self.theme.alert } else { self.theme.success };
                text.push(Line::from(vec![
                    Span::raw(format!("{label}: ")),
                    Span::styled(value, Style::default().fg(color)),
                ]));
            }
        }

        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(styled_block("Score", &self.theme)),
            area,
        );
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let hint = match self.game.phase() {
            GamePhase::CardSelection => "Pick a card",
            GamePhase::Question => "Read carefully",
            GamePhase::Answers => "Choose an answer",
            _ => "",
        };
        let status = Paragraph::new(format!(" {} | Press ? for help | q to quit ", hint))
            .style(Style::default().fg(self.theme.fg).bg(Color::DarkGray));
        frame.render_widget(status, area);
    }

    fn render_finished(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Clear, area);

        let state = self.game.state();
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Game over!",
                Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} points", state.score),
                Style::default().fg(self.theme.warning).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("You finished {} questions!", state.questions.len())),
            Line::from(""),
            Line::from(format!("Total questions:      {:>4}", state.questions.len())),
            Line::from(format!("Final score:          {:>4}", state.score)),
            Line::from(format!("Average per question: {:>4}", state.average_score())),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to play again",
                Style::default().fg(self.theme.success),
            )),
        ];

        let results = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(styled_block("Results", &self.theme));
        frame.render_widget(results, centered_rect(50, 14, area));
    }

    fn render_toasts(&self, frame: &mut Frame) {
        let toasts: Vec<_> = self.game.notifier().visible().collect();
        if toasts.is_empty() {
            return;
        }

        let area = frame.area();
        let width = 36.min(area.width);
        let height = (toasts.len() as u16 + 2).min(area.height);
        let popup = Rect::new(area.x + area.width - width, area.y, width, height);

        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        for (i, toast) in toasts.iter().enumerate().take(inner.height as usize) {
            let line = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
            frame.render_widget(NoticeLine::new(toast.kind, &toast.message), line);
        }
    }

    fn render_help_overlay(&self, frame: &mut Frame) {
        let popup_area = centered_rect(53, 15, frame.area());

        frame.render_widget(Clear, popup_area);

        let help = Paragraph::new(HELP_TEXT)
            .style(Style::default().fg(self.theme.fg))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.accent)));
        frame.render_widget(help, popup_area);
    }
}
