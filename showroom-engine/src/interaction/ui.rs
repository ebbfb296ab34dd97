use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use constants::loading::{LINE_INTERVAL_SECONDS, LOADING_TEXT, OVERLAY_LINGER_SECONDS};
use constants::navigation::PANEL_WIDTH_PX;

use super::navigation::{NavigationController, StageParams};
use super::overlay_panel::{OverlayPanelRoot, PANEL_HEIGHT_PX};
use crate::engine::core::app_state::AppState;
use crate::engine::scene::{ZoneId, ZoneRegistry};

/// Page furniture the navigation controller can only show or hide.
pub trait Collaborator {
    fn show(&mut self);
    fn hide(&mut self);
    fn is_shown(&self) -> bool;

    fn toggle(&mut self) {
        if self.is_shown() { self.hide() } else { self.show() }
    }
}

/// Slide-out menu listing one entry per zone.
#[derive(Resource, Debug, Default)]
pub struct SideMenu {
    shown: bool,
}

impl Collaborator for SideMenu {
    fn show(&mut self) { self.shown = true; }
    fn hide(&mut self) { self.shown = false; }
    fn is_shown(&self) -> bool { self.shown }
}

/// Full-screen overlay revealing the loading text line by line. It hides
/// once the showroom is running and every line has been shown for a while.
#[derive(Resource, Debug)]
pub struct LoadingOverlay {
    shown: bool,
    revealed: usize,
    since_last_line: f32,
    lingered: f32,
}

impl Default for LoadingOverlay {
    fn default() -> Self {
        Self { shown: true, revealed: 0, since_last_line: 0.0, lingered: 0.0 }
    }
}

impl Collaborator for LoadingOverlay {
    fn show(&mut self) { self.shown = true; }
    fn hide(&mut self) { self.shown = false; }
    fn is_shown(&self) -> bool { self.shown }
}

impl LoadingOverlay {
    /// Advance the reveal clock. Returns the index of a newly revealed line.
    pub fn advance(&mut self, delta_seconds: f32, scene_ready: bool) -> Option<usize> {
        if !self.shown {
            return None;
        }

        if self.revealed < LOADING_TEXT.len() {
            self.since_last_line += delta_seconds;
            if self.since_last_line >= LINE_INTERVAL_SECONDS {
                self.since_last_line -= LINE_INTERVAL_SECONDS;
                self.revealed += 1;
                return Some(self.revealed - 1);
            }
            return None;
        }

        if scene_ready {
            self.lingered += delta_seconds;
            if self.lingered >= OVERLAY_LINGER_SECONDS {
                self.hide();
                info!("Loading overlay hidden");
            }
        }
        None
    }
}

#[derive(Component)]
pub struct LoadingOverlayRoot;

#[derive(Component)]
pub struct LoadingLine(pub usize);

#[derive(Component)]
pub struct SideMenuPanel;

#[derive(Component)]
pub struct MenuToggleButton;

#[derive(Component)]
pub struct MenuEntry(pub ZoneId);

#[derive(Component)]
pub struct PanelCloseButton;

#[derive(Component)]
pub struct FpsText;

const BUTTON_IDLE: Color = Color::srgb(0.22, 0.24, 0.28);
const BUTTON_HOVER: Color = Color::srgb(0.26, 0.28, 0.32);
const BUTTON_PRESSED: Color = Color::srgb(0.18, 0.20, 0.24);

fn button_node(width: Val) -> Node {
    Node {
        width,
        height: Val::Px(36.0),
        display: Display::Flex,
        align_items: AlignItems::Center,
        justify_content: JustifyContent::Center,
        border: UiRect::all(Val::Px(1.0)),
        ..default()
    }
}

fn label(text: impl Into<String>, size: f32) -> (Text, TextFont, TextColor) {
    (Text::new(text), TextFont { font_size: size, ..default() }, TextColor(Color::WHITE))
}

// Black screen with the loading lines, all hidden until revealed
pub fn spawn_loading_overlay(mut commands: Commands) {
    commands
        .spawn((
            LoadingOverlayRoot,
            Name::new("LoadingOverlay"),
            BackgroundColor(Color::BLACK),
            GlobalZIndex(10),
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                padding: UiRect::all(Val::Px(32.0)),
                row_gap: Val::Px(6.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::FlexEnd,
                ..default()
            },
        ))
        .with_children(|overlay| {
            for (index, line) in LOADING_TEXT.iter().enumerate() {
                overlay.spawn((
                    LoadingLine(index),
                    Text::new(*line),
                    TextFont { font_size: 16.0, ..default() },
                    TextColor(Color::srgb(0.0, 1.0, 0.4)),
                    Visibility::Hidden,
                ));
            }
        });
}

pub fn reflect_loading_overlay(
    time: Res<Time>,
    state: Res<State<AppState>>,
    mut overlay: ResMut<LoadingOverlay>,
    mut lines: Query<(&LoadingLine, &mut Visibility), Without<LoadingOverlayRoot>>,
    mut roots: Query<&mut Visibility, With<LoadingOverlayRoot>>,
) {
    if !overlay.is_shown() { return; }

    let ready = *state.get() == AppState::Running;
    if let Some(revealed) = overlay.advance(time.delta_secs(), ready) {
        for (line, mut visibility) in &mut lines {
            if line.0 == revealed { *visibility = Visibility::Inherited; }
        }
    }

    if !overlay.is_shown() {
        for mut visibility in &mut roots { *visibility = Visibility::Hidden; }
    }
}

// Menu toggle plus the collapsible list of zone entries, built once zones exist
pub fn spawn_side_menu(mut commands: Commands, zones: Res<ZoneRegistry>) {
    commands
        .spawn((
            MenuToggleButton,
            Name::new("MenuToggle"),
            Button,
            BackgroundColor(BUTTON_IDLE),
            BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                left: Val::Px(12.0),
                ..button_node(Val::Px(96.0))
            },
        ))
        .with_children(|button| {
            button.spawn(label("Menu", 16.0));
        });

    commands
        .spawn((
            SideMenuPanel,
            Name::new("SideMenu"),
            BackgroundColor(Color::srgb(0.10, 0.11, 0.13)),
            Visibility::Hidden,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(56.0),
                left: Val::Px(12.0),
                width: Val::Px(220.0),
                padding: UiRect::all(Val::Px(12.0)),
                row_gap: Val::Px(8.0),
                flex_direction: FlexDirection::Column,
                ..default()
            },
        ))
        .with_children(|panel| {
            for zone in zones.iter() {
                panel
                    .spawn((
                        MenuEntry(zone.id),
                        Name::new(format!("MenuEntry:{}", zone.name)),
                        Button,
                        BackgroundColor(BUTTON_IDLE),
                        BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                        button_node(Val::Percent(100.0)),
                    ))
                    .with_children(|entry| {
                        entry.spawn(label(zone.menu_label.clone(), 16.0));
                    });
            }
        });
}

pub fn menu_toggle_interaction(
    mut q: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>, With<MenuToggleButton>)>,
    mut menu: ResMut<SideMenu>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => { menu.toggle(); *bg = BackgroundColor(BUTTON_PRESSED); }
            Interaction::Hovered => *bg = BackgroundColor(BUTTON_HOVER),
            Interaction::None    => *bg = BackgroundColor(BUTTON_IDLE),
        }
    }
}

// Menu entries fly to their zone, activation closes the menu
pub fn menu_entry_interaction(
    mut q: Query<(&Interaction, &MenuEntry, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
    mut navigation: ResMut<NavigationController>,
    mut stage: StageParams,
) {
    for (interaction, entry, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                navigation.activate_zone(entry.0, &mut stage.stage());
                *bg = BackgroundColor(BUTTON_PRESSED);
            }
            Interaction::Hovered => *bg = BackgroundColor(BUTTON_HOVER),
            Interaction::None    => *bg = BackgroundColor(BUTTON_IDLE),
        }
    }
}

pub fn reflect_side_menu(
    menu: Res<SideMenu>,
    mut q: Query<&mut Visibility, With<SideMenuPanel>>,
) {
    if !menu.is_changed() { return; }
    for mut visibility in &mut q {
        *visibility = if menu.is_shown() { Visibility::Visible } else { Visibility::Hidden };
    }
}

// Overlay panel surface: title, body copy and a close button
pub fn spawn_overlay_panel(mut commands: Commands) {
    commands
        .spawn((
            OverlayPanelRoot,
            Name::new("OverlayPanel"),
            BackgroundColor(Color::srgba(0.05, 0.05, 0.08, 0.0)),
            Visibility::Hidden,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Px(PANEL_WIDTH_PX),
                height: Val::Px(PANEL_HEIGHT_PX),
                padding: UiRect::all(Val::Px(16.0)),
                row_gap: Val::Px(10.0),
                flex_direction: FlexDirection::Column,
                ..default()
            },
        ))
        .with_children(|panel| {
            panel.spawn(label("Sign up", 24.0));
            panel.spawn(label(
                "Get exclusive access to new drops and brands from around the world.",
                16.0,
            ));
            panel
                .spawn((
                    PanelCloseButton,
                    Name::new("PanelClose"),
                    Button,
                    BackgroundColor(BUTTON_IDLE),
                    BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                    button_node(Val::Px(96.0)),
                ))
                .with_children(|button| {
                    button.spawn(label("Close", 16.0));
                });
        });
}

pub fn panel_close_interaction(
    mut q: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>, With<PanelCloseButton>)>,
    mut navigation: ResMut<NavigationController>,
    mut stage: StageParams,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                if let Some(zone) = navigation.active_zone() {
                    navigation.dismiss_zone(zone, &mut stage.stage());
                }
                *bg = BackgroundColor(BUTTON_PRESSED);
            }
            Interaction::Hovered => *bg = BackgroundColor(BUTTON_HOVER),
            Interaction::None    => *bg = BackgroundColor(BUTTON_IDLE),
        }
    }
}

pub fn spawn_fps_text(mut commands: Commands) {
    commands.spawn((
        Text::new("FPS: "),
        TextFont { font_size: 16.0, ..default() },
        TextColor(Color::srgb(1., 0., 0.)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            right: Val::Px(12.0),
            ..default()
        },
        FpsText,
    ));
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(value) = diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FPS)
            .and_then(|fps| fps.smoothed())
        {
            text.0 = format!("FPS: {value:.1}");
        }
    }
}
