//! The session context: owns the dataset, the scene objects, both timers
//! and the interaction state, and turns input plus frame ticks into draw
//! requests and UI updates.

use chrono::NaiveDate;
use glam::{Mat4, Vec2};
use rand::{rngs::StdRng, SeedableRng};
use smallvec::SmallVec;

use crate::assets::{AssetKind, AssetState};
use crate::camera::{pixel_to_ndc, Camera, CameraDrive, CameraPose};
use crate::carousel::CarouselNav;
use crate::config::ExperienceConfig;
use crate::error::LoadError;
use crate::interaction::{spawn_allowed, ClickOutcome, InteractionState, Mode};
use crate::path::PathCurve;
use crate::path_text::{build_path_texts, PathText};
use crate::registry::StoryPointRegistry;
use crate::scene::{CloudDraw, CloudLayer, DrawList, PointCloud};
use crate::starfield::{
    generate_galaxy, generate_parallax_belt, GalaxyState, ShootingStarField, SpawnSchedule,
    SpawnTrigger,
};
use crate::story::StoryDataset;
use crate::temporal::{calculate_age, calculate_stats, is_birthday};
use crate::ui::{format_age, PathLabel, StatsText, UiUpdate, INTRO_AGE_TEXT};

// Longest frame step applied; a backgrounded tab resumes with a huge dt.
const MAX_FRAME_DT: f32 = 0.25;
// Labels this far outside NDC are reported as off screen.
const LABEL_NDC_LIMIT: f32 = 1.2;

pub struct Session {
    config: ExperienceConfig,
    rng: StdRng,
    story: AssetState<StoryDataset>,
    font: AssetState<String>,
    curve: PathCurve,
    registry: StoryPointRegistry,
    path_texts: Vec<PathText>,
    galaxy: GalaxyState,
    layers: SmallVec<[CloudLayer; 2]>,
    pending_clouds: Vec<PointCloud>,
    shooting: ShootingStarField,
    schedule: SpawnSchedule,
    interaction: InteractionState,
    drive: CameraDrive,
    camera: Camera,
    viewport: Vec2,
    pointer: Option<Vec2>,
    journey_date: NaiveDate,
    age_text: String,
    ui: Vec<UiUpdate>,
}

impl Session {
    pub fn new(config: ExperienceConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let camera = Camera::new(&config.camera, 1.0);
        Self {
            rng,
            story: AssetState::Unloaded,
            font: AssetState::Unloaded,
            curve: PathCurve::fallback(),
            registry: StoryPointRegistry::new(config.registry.clone()),
            path_texts: Vec::new(),
            galaxy: GalaxyState::new(&config.galaxy),
            layers: SmallVec::new(),
            pending_clouds: Vec::new(),
            shooting: ShootingStarField::new(config.shooting_stars.clone()),
            schedule: SpawnSchedule::new(&config.shooting_stars),
            interaction: InteractionState::new(config.carousel.clone()),
            drive: CameraDrive::new(config.camera.clone()),
            camera,
            viewport: Vec2::ONE,
            pointer: None,
            journey_date: config.birth_date,
            age_text: INTRO_AGE_TEXT.to_string(),
            ui: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &ExperienceConfig {
        &self.config
    }

    pub fn begin_loading(&mut self) {
        self.story.begin();
        self.font.begin();
        self.ui.push(UiUpdate::IntroVisible(true));
        self.ui.push(UiUpdate::AgeText(self.age_text.clone()));
    }

    /// Installs the loaded dataset and builds the whole scene.
    pub fn install(&mut self, dataset: StoryDataset, font_family: String, today: NaiveDate) {
        self.story.resolve(Ok(dataset));
        self.font.resolve(Ok(font_family));
        self.build_scene();

        let intro = &self.config.intro;
        let (title, message) = if is_birthday(today, self.config.birth_date) {
            (intro.birthday_title.clone(), intro.birthday_message.clone())
        } else {
            (intro.title.clone(), intro.message.clone())
        };
        self.ui.push(UiUpdate::IntroText {
            title,
            message,
            show_button: true,
        });
        if self.interaction.mode() == Mode::Intro {
            self.schedule.start(&mut self.rng);
        }
    }

    fn build_scene(&mut self) {
        let Some(dataset) = self.story.ready() else {
            log::warn!("[scene] story data not ready; nothing to build");
            return;
        };
        let positions = dataset.positions();

        self.curve = PathCurve::build(&positions, self.config.curve);
        self.registry.rebuild(dataset);

        self.path_texts = if self.font.is_ready() && !dataset.is_empty() {
            build_path_texts(dataset, &self.config.path_text)
        } else {
            log::warn!("[scene] font or story data missing; skipping path labels");
            Vec::new()
        };
        self.ui.push(UiUpdate::PathLabelsCreated(
            self.path_texts.iter().map(|t| t.text.clone()).collect(),
        ));

        self.layers.clear();
        self.pending_clouds.clear();
        let galaxy = generate_galaxy(&self.config.galaxy, &mut self.rng);
        self.layers.push(galaxy.layer);
        self.pending_clouds.push(galaxy);
        if let Some(belt) = generate_parallax_belt(&positions, &self.config.parallax, &mut self.rng)
        {
            self.layers.push(belt.layer);
            self.pending_clouds.push(belt);
        }
        self.galaxy = GalaxyState::new(&self.config.galaxy);

        log::info!(
            "[scene] built: {} points, {} labels, {} star layers",
            self.registry.len(),
            self.path_texts.len(),
            self.layers.len()
        );
    }

    /// Records the first load failure and shows it on the intro overlay.
    pub fn fail_load(&mut self, err: &LoadError) {
        let reason = err.to_string();
        log::error!("[assets] {reason}");
        match err.asset() {
            AssetKind::Font => self.font.resolve(Err(reason.clone())),
            AssetKind::StoryData => self.story.resolve(Err(reason.clone())),
            AssetKind::StarTexture | AssetKind::BackgroundStarTexture => {}
        }
        // no partial scene: the dataset is only usable once everything loaded
        if !self.story.is_failed() {
            self.story.resolve(Err(format!("{} failed to load", err.asset())));
        }
        self.ui.push(UiUpdate::IntroText {
            title: self.config.intro.error_title.clone(),
            message: format!("Failed to load essential resources. Error: {reason}"),
            show_button: false,
        });
        self.ui.push(UiUpdate::IntroVisible(true));
    }

    pub fn is_ready(&self) -> bool {
        self.story.is_ready()
    }

    pub fn dataset(&self) -> Option<&StoryDataset> {
        self.story.ready()
    }

    /// Star layers built since the last call, for upload.
    pub fn take_clouds(&mut self) -> Vec<PointCloud> {
        std::mem::take(&mut self.pending_clouds)
    }

    /// Leaves the intro. Refused (with a message) until the scene is ready.
    pub fn dismiss_intro(&mut self) -> bool {
        if self.interaction.is_active() {
            return false;
        }
        if !self.is_ready() {
            let intro = &self.config.intro;
            self.ui.push(UiUpdate::IntroText {
                title: intro.title.clone(),
                message: intro.loading_message.clone(),
                show_button: !self.story.is_failed(),
            });
            return false;
        }
        self.schedule.cancel();
        self.interaction
            .set_mode(Mode::Active, &mut self.registry, &mut self.ui);
        self.drive.reset();
        self.drive.begin_flight(self.camera.pose(), &self.curve);
        self.ui.push(UiUpdate::IntroVisible(false));
        log::info!("[session] intro dismissed");
        true
    }

    pub fn return_to_intro(&mut self) {
        if !self.interaction.is_active() {
            return;
        }
        self.interaction
            .set_mode(Mode::Intro, &mut self.registry, &mut self.ui);
        self.schedule.start(&mut self.rng);
        self.journey_date = self.config.birth_date;
        self.set_age_text(INTRO_AGE_TEXT.to_string());
        self.ui.push(UiUpdate::IntroVisible(true));
        log::info!("[session] back to intro");
    }

    pub fn toggle_intro(&mut self) {
        if self.interaction.is_active() {
            self.return_to_intro();
        } else {
            self.dismiss_intro();
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
        self.camera.aspect = self.viewport.x / self.viewport.y;
    }

    pub fn on_pointer_move(&mut self, px: Vec2) {
        self.pointer = Some(px);
    }

    pub fn on_pointer_leave(&mut self) {
        self.pointer = None;
    }

    /// Wheel input. Returns whether it was consumed.
    pub fn on_scroll(&mut self, delta_y: f32) -> bool {
        if !self.interaction.is_active() {
            return false;
        }
        self.drive.on_scroll(delta_y);
        true
    }

    pub fn on_click(&mut self, px: Vec2) -> ClickOutcome {
        self.pointer = Some(px);
        let hit = if self.interaction.is_active() {
            self.pick_at(px)
        } else {
            None
        };
        let outcome = self.interaction.on_background_click(hit);
        if outcome == ClickOutcome::SpawnShootingStar {
            self.shooting.spawn(&self.camera, &mut self.rng);
        }
        outcome
    }

    /// Keyboard input. Returns whether the key was used.
    pub fn on_key(&mut self, key: &str) -> bool {
        match key {
            "h" | "H" => {
                self.toggle_intro();
                true
            }
            _ if self.interaction.is_active() => self.interaction.on_key(key, &mut self.ui),
            _ => false,
        }
    }

    pub fn navigate_carousel(&mut self, nav: CarouselNav) -> bool {
        self.interaction.navigate(nav, &mut self.ui)
    }

    pub fn toggle_stats(&mut self) {
        let visible = self.interaction.toggle_tooltip();
        self.push_stats_visibility(visible);
    }

    pub fn stats_hover(&mut self, entering: bool) {
        if let Some(visible) = self.interaction.tooltip_hover(entering) {
            self.push_stats_visibility(visible);
        }
    }

    fn push_stats_visibility(&mut self, visible: bool) {
        if visible {
            let text = self.stats_text();
            self.ui.push(UiUpdate::StatsContent(text));
        }
        self.ui.push(UiUpdate::StatsVisible(visible));
    }

    pub fn stats_text(&self) -> StatsText {
        let birth = self.config.birth_date;
        let age = calculate_age(birth, self.journey_date);
        StatsText::from(&calculate_stats(birth, age.total_days))
    }

    fn set_age_text(&mut self, text: String) {
        if text != self.age_text {
            self.age_text = text;
            self.ui.push(UiUpdate::AgeText(self.age_text.clone()));
        }
    }

    fn pick_at(&self, px: Vec2) -> Option<usize> {
        let ray = self.camera.ray_from_ndc(pixel_to_ndc(px, self.viewport));
        self.registry.pick(&ray)
    }

    /// One animation frame.
    pub fn frame(&mut self, dt: f32, today: NaiveDate) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };

        self.galaxy.spin();
        self.registry.advance(dt);
        self.shooting.update(dt, &mut self.rng);

        let fired = self.schedule.tick(dt, &mut self.rng);
        if fired && spawn_allowed(self.interaction.mode(), SpawnTrigger::Schedule) {
            self.shooting.spawn(&self.camera, &mut self.rng);
        }

        self.interaction.tick(dt, &mut self.ui);

        if self.interaction.is_active() {
            self.active_frame(dt, today);
        }

        self.update_path_labels();
    }

    fn active_frame(&mut self, dt: f32, today: NaiveDate) {
        let pose = self.drive.update(dt, &self.curve);
        self.camera.set_pose(pose);
        self.galaxy.recenter(self.camera.eye);

        let hit = self.pointer.and_then(|px| self.pick_at(px));
        if let Some(dataset) = self.story.ready() {
            self.interaction
                .update_hover(hit, &mut self.registry, dataset, &mut self.ui);
            self.journey_date = self.drive.journey_date(dataset, today);
        }

        let age = calculate_age(self.config.birth_date, self.journey_date);
        let text = format_age(&age);
        if text != self.age_text && self.interaction.tooltip_visible() {
            let stats = self.stats_text();
            self.ui.push(UiUpdate::StatsContent(stats));
        }
        self.set_age_text(text);
    }

    fn update_path_labels(&mut self) {
        if self.path_texts.is_empty() {
            return;
        }
        let eye = self.camera.eye;
        let config = &self.config.path_text;
        let camera = &self.camera;
        let viewport = self.viewport;
        let labels = self
            .path_texts
            .iter_mut()
            .enumerate()
            .map(|(index, text)| {
                text.update(eye, config);
                let screen = camera
                    .project(text.position)
                    .filter(|ndc| ndc.abs().max_element() <= LABEL_NDC_LIMIT)
                    .map(|ndc| {
                        Vec2::new(
                            (ndc.x + 1.0) * 0.5 * viewport.x,
                            (1.0 - ndc.y) * 0.5 * viewport.y,
                        )
                    });
                PathLabel {
                    index,
                    screen,
                    opacity: text.opacity(),
                }
            })
            .collect();
        self.ui.push(UiUpdate::PathLabels(labels));
    }

    pub fn draw_list(&self) -> DrawList {
        let mut list = DrawList::default();
        for layer in &self.layers {
            let model = match layer {
                CloudLayer::Galaxy => self.galaxy.model(),
                CloudLayer::Parallax => Mat4::IDENTITY,
            };
            list.clouds.push(CloudDraw {
                layer: *layer,
                model,
            });
        }
        self.registry.draw(&mut list.billboards);
        self.shooting.draw(&mut list.billboards);
        list.sort();
        list
    }

    pub fn drain_ui(&mut self) -> Vec<UiUpdate> {
        std::mem::take(&mut self.ui)
    }

    pub fn mode(&self) -> Mode {
        self.interaction.mode()
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn registry(&self) -> &StoryPointRegistry {
        &self.registry
    }

    pub fn curve(&self) -> &PathCurve {
        &self.curve
    }

    pub fn path_texts(&self) -> &[PathText] {
        &self.path_texts
    }

    pub fn shooting_stars(&self) -> &ShootingStarField {
        &self.shooting
    }

    pub fn schedule(&self) -> &SpawnSchedule {
        &self.schedule
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_pose(&self) -> CameraPose {
        self.camera.pose()
    }

    pub fn progress(&self) -> f32 {
        self.drive.progress()
    }

    pub fn is_flying(&self) -> bool {
        self.drive.is_flying()
    }

    pub fn journey_date(&self) -> NaiveDate {
        self.journey_date
    }

    pub fn age_text(&self) -> &str {
        &self.age_text
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Last pointer position over the canvas, in CSS pixels.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }
}
