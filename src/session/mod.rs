//! Aiming/Editing state machine.
//!
//! The session is the only writer of the interaction mode and of the
//! selected-object relation. It also owns the color model, the gradient
//! raster and the picker geometry, and is the only component that pushes
//! colors onto materials and notifies the presentation layer.

use glam::Vec2;

use crate::color::{ColorModel, GradientBuffer, GradientRaster, Hsv, Rgb};
use crate::config::{Config, ConfigError};
use crate::picker::{hue_to_position, position_to_hue, PickerGeometry, PickerLayout};
use crate::pointer::PointerPhase;
use crate::targeting::{CameraProjection, ObjectId, SpatialQuery, Targeting};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Aiming,
    Editing,
}

/// Readable/writable base color of scene objects.
pub trait MaterialSink {
    fn base_color(&self, object: ObjectId) -> Option<Rgb>;
    /// Returns `false` when the object no longer exists.
    fn set_base_color(&mut self, object: ObjectId, rgb: Rgb) -> bool;
}

/// Borrowed snapshot of everything the picker surface displays.
#[derive(Debug, Clone, Copy)]
pub struct PickerView<'a> {
    pub hue: &'a GradientBuffer,
    pub saturation_value: &'a GradientBuffer,
    pub output: &'a GradientBuffer,
    pub marker: Vec2,
    pub marker_tint: Rgb,
    /// Handle position on the hue strip.
    pub hue_marker: Vec2,
    pub hsv: Hsv,
    pub rgb: Rgb,
}

/// Notifications for the presentation layer.
pub trait SessionObserver {
    fn on_object_selected(&mut self, object: ObjectId);
    fn on_picker_updated(&mut self, view: PickerView<'_>);
    fn on_session_closed(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Aiming,
    Editing { object: ObjectId },
}

pub struct SelectionSession {
    state: State,
    model: ColorModel,
    raster: GradientRaster,
    geometry: PickerGeometry,
    layout: PickerLayout,
}

impl SelectionSession {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let model = ColorModel::new();
        let raster = GradientRaster::new(config.hue_resolution, config.sv_resolution, &model)?;
        Ok(Self {
            state: State::Aiming,
            model,
            raster,
            geometry: PickerGeometry::new(config.picker.sv_area),
            layout: config.picker,
        })
    }

    pub fn mode(&self) -> SessionMode {
        match self.state {
            State::Aiming => SessionMode::Aiming,
            State::Editing { .. } => SessionMode::Editing,
        }
    }

    pub fn selected(&self) -> Option<ObjectId> {
        match self.state {
            State::Aiming => None,
            State::Editing { object } => Some(object),
        }
    }

    /// Look/camera input is live only while aiming.
    pub fn accepts_look_input(&self) -> bool {
        self.state == State::Aiming
    }

    pub fn model(&self) -> &ColorModel {
        &self.model
    }

    pub fn raster(&self) -> &GradientRaster {
        &self.raster
    }

    pub fn geometry(&self) -> &PickerGeometry {
        &self.geometry
    }

    pub fn layout(&self) -> &PickerLayout {
        &self.layout
    }

    pub fn view(&self) -> PickerView<'_> {
        PickerView {
            hue: self.raster.hue(),
            saturation_value: self.raster.saturation_value(),
            output: self.raster.output(),
            marker: self.geometry.marker(),
            marker_tint: self.geometry.marker_tint(),
            hue_marker: hue_to_position(self.model.hsv().h, &self.layout.hue_strip),
            hsv: self.model.hsv(),
            rgb: self.model.rgb(),
        }
    }

    /// Aiming → Editing through targeting. Returns the selected object, or
    /// `None` if the session is already editing or nothing was hit.
    pub fn select_at<S>(
        &mut self,
        screen_pos: Vec2,
        targeting: &Targeting,
        camera: Option<&dyn CameraProjection>,
        scene: &mut S,
        observer: &mut dyn SessionObserver,
    ) -> Option<ObjectId>
    where
        S: SpatialQuery + MaterialSink,
    {
        if self.state != State::Aiming {
            log::debug!("targeting input ignored while editing");
            return None;
        }
        let object = targeting.pick_object(screen_pos, camera, &*scene)?;
        self.begin_editing(object, &*scene, observer).then_some(object)
    }

    /// Aiming → Editing for an already resolved object. Loads the object's
    /// current color into the picker. Returns `false` if not aiming or the
    /// object has no readable color.
    pub fn begin_editing(
        &mut self,
        object: ObjectId,
        materials: &dyn MaterialSink,
        observer: &mut dyn SessionObserver,
    ) -> bool {
        if self.state != State::Aiming {
            log::debug!("begin_editing({:?}) ignored while editing", object);
            return false;
        }
        let Some(rgb) = materials.base_color(object) else {
            log::warn!("object {:?} has no readable base color", object);
            return false;
        };

        self.model.load_rgb(rgb);
        let hsv = self.model.hsv();
        self.geometry.place(hsv.s, hsv.v);
        self.raster.sync(&mut self.model);
        self.state = State::Editing { object };

        log::info!(
            "editing object {:?}: #{} (h {:.3}, s {:.3}, v {:.3})",
            object.0,
            rgb.to_hex(),
            hsv.h,
            hsv.s,
            hsv.v
        );
        observer.on_object_selected(object);
        observer.on_picker_updated(self.view());
        true
    }

    /// Editing → Editing from the SV area. Click and drag both land here.
    /// Returns the color written to the selected object.
    pub fn pointer_in_picker(
        &mut self,
        pos: Vec2,
        phase: PointerPhase,
        materials: &mut dyn MaterialSink,
        observer: &mut dyn SessionObserver,
    ) -> Option<Rgb> {
        let object = self.editing_target(phase)?;
        let (s, v) = self.geometry.track_pointer(pos);
        self.model.set_sv(s, v);
        Some(self.apply(object, materials, observer))
    }

    /// Editing → Editing from the hue strip.
    pub fn pointer_in_hue_strip(
        &mut self,
        pos: Vec2,
        phase: PointerPhase,
        materials: &mut dyn MaterialSink,
        observer: &mut dyn SessionObserver,
    ) -> Option<Rgb> {
        let object = self.editing_target(phase)?;
        self.model.set_hue(position_to_hue(pos, &self.layout.hue_strip));
        Some(self.apply(object, materials, observer))
    }

    /// Editing → Aiming. Returns `false` if there was nothing to close.
    pub fn close(&mut self, observer: &mut dyn SessionObserver) -> bool {
        let State::Editing { object } = self.state else {
            return false;
        };
        self.state = State::Aiming;
        log::info!("closed picker for object {:?}", object.0);
        observer.on_session_closed();
        true
    }

    fn editing_target(&self, phase: PointerPhase) -> Option<ObjectId> {
        if phase == PointerPhase::Cancelled {
            return None;
        }
        match self.state {
            State::Editing { object } => Some(object),
            State::Aiming => {
                log::debug!("picker input ignored while aiming");
                None
            }
        }
    }

    fn apply(
        &mut self,
        object: ObjectId,
        materials: &mut dyn MaterialSink,
        observer: &mut dyn SessionObserver,
    ) -> Rgb {
        self.raster.sync(&mut self.model);
        let rgb = self.model.rgb();
        if !materials.set_base_color(object, rgb) {
            log::warn!("object {:?} vanished while editing", object.0);
        }
        observer.on_picker_updated(self.view());
        rgb
    }
}
