//! View-side state container for the globe.
//!
//! The view never mutates markers in place on data changes: every update to
//! people or airports re-derives the whole [`MarkerLayout`] from an immutable
//! [`GlobeSnapshot`]. Only the blink scale changes per frame.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use foundation::time::Time;
use runtime::{Event, EventBus, Frame, FrameLoop, Subscription};

use crate::airport::AirportTable;
use crate::animation::animate;
use crate::error::DataValidationError;
use crate::layout::{MarkerLayout, build_markers};
use crate::person::{Person, PersonId};
use crate::picking::{PickOptions, Ray, pick_marker};

/// Immutable inputs the markers are derived from.
#[derive(Debug, Clone, Default)]
pub struct GlobeSnapshot {
    pub people: Arc<[Person]>,
    pub airports: Arc<AirportTable>,
}

impl GlobeSnapshot {
    pub fn new(people: impl Into<Arc<[Person]>>, airports: impl Into<Arc<AirportTable>>) -> Self {
        Self {
            people: people.into(),
            airports: airports.into(),
        }
    }

    pub fn layout(&self) -> Result<MarkerLayout, DataValidationError> {
        build_markers(&self.people, &self.airports)
    }
}

/// Request for the surrounding application to open a person's page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub person_id: PersonId,
}

impl NavigationRequest {
    pub fn path(&self) -> String {
        format!("/neighborhood/{}", self.person_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobeEvent {
    Navigate(NavigationRequest),
}

#[derive(Debug)]
pub struct GlobeView {
    snapshot: GlobeSnapshot,
    layout: MarkerLayout,
    mounted_at: Option<Time>,
    last_frame: Frame,
    events: EventBus<GlobeEvent>,
}

impl Default for GlobeView {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobeView {
    pub fn new() -> Self {
        Self {
            snapshot: GlobeSnapshot::default(),
            layout: MarkerLayout::default(),
            mounted_at: None,
            last_frame: Frame::new(0, 0.0),
            events: EventBus::new(),
        }
    }

    pub fn snapshot(&self) -> &GlobeSnapshot {
        &self.snapshot
    }

    pub fn layout(&self) -> &MarkerLayout {
        &self.layout
    }

    /// Replace the inputs and re-derive every marker.
    ///
    /// On error the previous snapshot and markers stay in place.
    pub fn set_snapshot(&mut self, snapshot: GlobeSnapshot) -> Result<(), DataValidationError> {
        let mut layout = snapshot.layout()?;
        if let Some(start) = self.mounted_at {
            animate(&mut layout.markers, self.last_frame.elapsed_since(start));
        }
        self.snapshot = snapshot;
        self.layout = layout;
        Ok(())
    }

    /// Data arrival: a fresh person list.
    pub fn set_people(&mut self, people: Vec<Person>) -> Result<(), DataValidationError> {
        let airports = Arc::clone(&self.snapshot.airports);
        self.set_snapshot(GlobeSnapshot::new(people, airports))
    }

    /// Data arrival: a fresh airport table.
    pub fn set_airports(&mut self, airports: AirportTable) -> Result<(), DataValidationError> {
        let people = Arc::clone(&self.snapshot.people);
        self.set_snapshot(GlobeSnapshot::new(people, airports))
    }

    /// Timer tick: update the blink scale of every marker.
    pub fn on_frame(&mut self, frame: Frame) {
        let start = *self.mounted_at.get_or_insert(frame.time);
        self.last_frame = frame;
        animate(&mut self.layout.markers, frame.elapsed_since(start));
    }

    /// A marker for `person_id` was clicked. Returns `false` for unknown ids.
    pub fn click(&mut self, person_id: &PersonId) -> bool {
        if self.layout.marker(person_id.as_str()).is_none() {
            return false;
        }
        self.navigate(person_id.clone());
        true
    }

    /// Pick along `ray` and request navigation to the hit marker's person.
    pub fn pick(&mut self, ray: Ray) -> Option<PersonId> {
        let hit = pick_marker(&self.layout.markers, ray, PickOptions::default())?;
        self.navigate(hit.person_id.clone());
        Some(hit.person_id)
    }

    fn navigate(&mut self, person_id: PersonId) {
        self.events.emit(
            self.last_frame,
            GlobeEvent::Navigate(NavigationRequest { person_id }),
        );
    }

    pub fn drain_events(&mut self) -> Vec<Event<GlobeEvent>> {
        self.events.drain()
    }

    /// Register the per-frame callback. The returned handle owns the
    /// registration; unmounting (or dropping) it stops the animation.
    pub fn mount(view: &Rc<RefCell<GlobeView>>, frames: &FrameLoop, now: Frame) -> MountedGlobe {
        {
            let mut v = view.borrow_mut();
            v.mounted_at = Some(now.time);
            v.last_frame = now;
        }
        let target = Rc::clone(view);
        let subscription = frames.start(move |frame| target.borrow_mut().on_frame(frame));
        MountedGlobe {
            view: Rc::clone(view),
            subscription,
        }
    }
}

/// A [`GlobeView`] attached to a [`FrameLoop`].
#[derive(Debug)]
pub struct MountedGlobe {
    view: Rc<RefCell<GlobeView>>,
    subscription: Subscription,
}

impl MountedGlobe {
    pub fn view(&self) -> &Rc<RefCell<GlobeView>> {
        &self.view
    }

    pub fn is_animating(&self) -> bool {
        self.subscription.is_active()
    }

    /// Release the frame callback and hand the view back.
    pub fn unmount(self) -> Rc<RefCell<GlobeView>> {
        let MountedGlobe { view, subscription } = self;
        drop(subscription);
        view.borrow_mut().mounted_at = None;
        view
    }
}
