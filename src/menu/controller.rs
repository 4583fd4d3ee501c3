use crate::menu::geometry::{Point, Rect};
use crate::menu::hit;
use crate::menu::item::{Item, ItemId};
use crate::menu::layout::RadialLayout;
use crate::surface::Surface;
use std::mem;
use strum::Display as StrumDisplay;

/// Callbacks the host receives while a menu is driven by pointer phases.
///
/// Every method has a default, so a host only implements what it cares about. With the
/// defaults the menu is always allowed and never has items of its own.
pub trait MenuDelegate {
    /// Asked once per press. Returning `false` suppresses the menu silently.
    fn should_show(&mut self, _at: Point) -> bool {
        true
    }

    /// Asked once per press when no items were handed in with [`MenuController::set_items`].
    fn items_for(&mut self, _at: Point) -> Vec<Item> {
        Vec::new()
    }

    fn opened(&mut self) {}

    fn closed(&mut self) {}

    fn activated(&mut self, _item: &Item) {}

    fn deactivated(&mut self, _item: &Item) {}

    fn selected(&mut self, _item: &Item) {}
}

#[derive(Debug, Clone, Copy, PartialEq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum PointerPhase {
    Began(Point),
    Moved(Point),
    Ended,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "kebab-case")]
pub enum Suppression {
    Declined,
    NoItems,
    SurfaceUnavailable,
}

/// What a pointer phase did to the menu.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The phase was not expected in the current state and was dropped.
    Ignored,
    Suppressed(Suppression),
    Opened,
    /// The pointer stayed over the same item (or over none).
    Unchanged,
    Hover {
        from: Option<usize>,
        to: Option<usize>,
    },
    Closed {
        selected: Option<ItemId>,
    },
}

impl Transition {
    pub fn should_redraw(&self) -> bool {
        matches!(
            self,
            Self::Opened | Self::Hover { .. } | Self::Closed { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub item: Item,
    pub frame: Rect,
    active: bool,
}

impl Entry {
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// One open menu, from the press that opened it to its teardown.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    anchor: Point,
    entries: Vec<Entry>,
    hovered: Option<usize>,
}

impl Session {
    fn new(anchor: Point, items: Vec<Item>, frames: Vec<Rect>) -> Self {
        let entries = items
            .into_iter()
            .zip(frames)
            .map(|(item, frame)| Entry {
                item,
                frame,
                active: false,
            })
            .collect();

        Self {
            anchor,
            entries,
            hovered: None,
        }
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn hovered(&self) -> Option<&Entry> {
        self.hovered.and_then(|idx| self.entries.get(idx))
    }

    pub fn hovered_index(&self) -> Option<usize> {
        self.hovered
    }

    fn active_item(&self) -> Option<&Item> {
        self.hovered()
            .filter(|entry| entry.active)
            .map(|entry| &entry.item)
    }

    fn activate<S: Surface, D: MenuDelegate>(
        &mut self,
        idx: usize,
        surface: &mut S,
        delegate: &mut D,
    ) {
        let Some(entry) = self.entries.get_mut(idx) else {
            return;
        };
        entry.active = true;
        surface.activate(idx, &entry.item);
        delegate.activated(&entry.item);
        self.hovered = Some(idx);
    }

    fn release_hover<S: Surface, D: MenuDelegate>(&mut self, surface: &mut S, delegate: &mut D) {
        let Some(idx) = self.hovered.take() else {
            return;
        };
        if let Some(entry) = self.entries.get_mut(idx)
            && entry.active
        {
            entry.active = false;
            surface.deactivate(idx, &entry.item);
            delegate.deactivated(&entry.item);
        }
    }
}

#[derive(Debug, Default)]
enum MenuState {
    #[default]
    Idle,
    Open(Session),
}

/// Turns pointer phases into menu sessions.
///
/// Idle until a press opens a session, open until release or cancel tears it down. Phases
/// that do not fit the current state are dropped without side effects.
pub struct MenuController<D, S> {
    delegate: D,
    surface: S,
    layout: RadialLayout,
    deferred_layout: Option<RadialLayout>,
    pending_items: Vec<Item>,
    state: MenuState,
}

impl<D: MenuDelegate, S: Surface> MenuController<D, S> {
    pub fn new(delegate: D, surface: S, layout: RadialLayout) -> Self {
        Self {
            delegate,
            surface,
            layout,
            deferred_layout: None,
            pending_items: Vec::new(),
            state: MenuState::Idle,
        }
    }

    pub fn handle(&mut self, phase: PointerPhase) -> Transition {
        match phase {
            PointerPhase::Began(at) => self.begin(at),
            PointerPhase::Moved(to) => self.moved(to),
            PointerPhase::Ended => self.ended(),
            PointerPhase::Cancelled => self.cancelled(),
        }
    }

    pub fn begin(&mut self, at: Point) -> Transition {
        if self.is_open() {
            log::trace!("Ignoring press at {:?}: a menu is already open", at);
            return Transition::Ignored;
        }

        if !self.delegate.should_show(at) {
            return self.suppress(Suppression::Declined);
        }

        let items = if self.pending_items.is_empty() {
            self.delegate.items_for(at)
        } else {
            mem::take(&mut self.pending_items)
        };
        if items.is_empty() {
            return self.suppress(Suppression::NoItems);
        }

        let frames = self.layout.layout(&items, at);
        if let Err(e) = self.surface.present(&items, &frames, at) {
            log::warn!("Menu surface unavailable: {}", e);
            return self.suppress(Suppression::SurfaceUnavailable);
        }

        log::debug!("Menu opened at {:?} with {} items", at, items.len());
        self.state = MenuState::Open(Session::new(at, items, frames));
        self.delegate.opened();
        Transition::Opened
    }

    pub fn moved(&mut self, to: Point) -> Transition {
        let Self {
            delegate,
            surface,
            state,
            ..
        } = self;
        let MenuState::Open(session) = state else {
            log::trace!("Ignoring move to {:?}: no menu open", to);
            return Transition::Ignored;
        };

        let hit = hit::resolve(to, session.entries.iter().map(|entry| &entry.frame));
        let from = session.hovered;
        if hit == from {
            return Transition::Unchanged;
        }

        session.release_hover(surface, delegate);
        if let Some(idx) = hit {
            session.activate(idx, surface, delegate);
        }

        log::trace!("Hover moved from {:?} to {:?}", from, hit);
        Transition::Hover { from, to: hit }
    }

    pub fn ended(&mut self) -> Transition {
        let MenuState::Open(session) = mem::take(&mut self.state) else {
            log::trace!("Ignoring release: no menu open");
            return Transition::Ignored;
        };

        let selected = session.active_item().cloned();
        if let Some(item) = &selected {
            log::debug!("Menu item '{}' selected", item.id);
            self.delegate.selected(item);
        }

        self.teardown(session);
        Transition::Closed {
            selected: selected.map(|item| item.id),
        }
    }

    pub fn cancelled(&mut self) -> Transition {
        let MenuState::Open(session) = mem::take(&mut self.state) else {
            log::trace!("Ignoring cancel: no menu open");
            return Transition::Ignored;
        };

        self.teardown(session);
        Transition::Closed { selected: None }
    }

    /// Drops any items handed in for the next press. Has no effect while a menu is open.
    pub fn reset(&mut self) {
        if self.is_open() {
            log::trace!("Ignoring reset: a menu is open");
            return;
        }
        self.pending_items.clear();
    }

    /// Items for the next press only; the delegate is not asked for items while these are set.
    pub fn set_items(&mut self, items: Vec<Item>) {
        self.pending_items = items;
    }

    /// Applies a new layout now, or once the open menu closes. Returns whether it applied now.
    pub fn reconfigure(&mut self, layout: RadialLayout) -> bool {
        if self.is_open() {
            self.deferred_layout = Some(layout);
            false
        } else {
            self.layout = layout;
            true
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, MenuState::Open(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            MenuState::Open(session) => Some(session),
            MenuState::Idle => None,
        }
    }

    pub fn layout(&self) -> &RadialLayout {
        &self.layout
    }

    pub fn pending_items(&self) -> &[Item] {
        &self.pending_items
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn suppress(&mut self, reason: Suppression) -> Transition {
        log::debug!("Menu suppressed: {}", reason);
        self.reset();
        Transition::Suppressed(reason)
    }

    fn teardown(&mut self, mut session: Session) {
        session.release_hover(&mut self.surface, &mut self.delegate);
        self.surface.dismiss();
        self.delegate.closed();
        self.pending_items.clear();

        if let Some(layout) = self.deferred_layout.take() {
            self.layout = layout;
        }
        log::debug!("Menu closed");
    }
}
