use crate::menu::{Item, ItemId, MenuController, MenuDelegate, Point, RadialLayout, Transition};
use crate::surface::HeadlessSurface;
use crate::sys::script::Command;

/// Host that answers from the configured items and writes down every lifecycle event.
pub struct ReplayHost {
    catalog: Vec<Item>,
    accept: bool,
    events: Vec<String>,
}

impl ReplayHost {
    pub fn new(catalog: Vec<Item>) -> Self {
        Self {
            catalog,
            accept: true,
            events: Vec::new(),
        }
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    /// Catalog entries for `ids`; unknown ids become items titled after themselves.
    fn lookup(&self, ids: &[ItemId]) -> Vec<Item> {
        ids.iter()
            .map(|id| {
                self.catalog
                    .iter()
                    .find(|item| &item.id == id)
                    .cloned()
                    .unwrap_or_else(|| Item::new(id.to_string(), id.to_string()))
            })
            .collect()
    }
}

impl MenuDelegate for ReplayHost {
    fn should_show(&mut self, _at: Point) -> bool {
        self.accept
    }

    fn items_for(&mut self, _at: Point) -> Vec<Item> {
        self.catalog.clone()
    }

    fn opened(&mut self) {
        self.events.push("opened".to_string());
    }

    fn closed(&mut self) {
        self.events.push("closed".to_string());
    }

    fn activated(&mut self, item: &Item) {
        self.events.push(format!("activated {}", item.id));
    }

    fn deactivated(&mut self, item: &Item) {
        self.events.push(format!("deactivated {}", item.id));
    }

    fn selected(&mut self, item: &Item) {
        self.events.push(format!("selected {}", item.id));
    }
}

pub type ReplayController = MenuController<ReplayHost, HeadlessSurface>;

pub fn replay(commands: &[Command], layout: RadialLayout, catalog: Vec<Item>) -> Vec<String> {
    let mut controller = MenuController::new(
        ReplayHost::new(catalog),
        HeadlessSurface::default(),
        layout,
    );

    for command in commands {
        run_command(&mut controller, command);
    }

    controller.delegate().events().to_vec()
}

fn run_command(controller: &mut ReplayController, command: &Command) {
    match command {
        Command::Pointer(phase) => {
            if let Transition::Suppressed(reason) = controller.handle(*phase) {
                controller
                    .delegate_mut()
                    .events
                    .push(format!("suppressed {}", reason));
            }
        }
        Command::Hover(id) => {
            let target = controller.session().and_then(|session| {
                session
                    .entries()
                    .iter()
                    .find(|entry| &entry.item.id == id)
                    .map(|entry| entry.frame.center())
            });
            match target {
                Some(point) => {
                    controller.moved(point);
                }
                None => log::warn!("Cannot hover '{}': not in an open menu", id),
            }
        }
        Command::Reset => controller.reset(),
        Command::Items(ids) => {
            let items = controller.delegate().lookup(ids);
            controller.set_items(items);
        }
        Command::Decline => controller.delegate_mut().accept = false,
        Command::Accept => controller.delegate_mut().accept = true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sys::script;

    fn catalog() -> Vec<Item> {
        vec![Item::new("i1", "One"), Item::new("i2", "Two")]
    }

    fn run(script: &str) -> Vec<String> {
        let commands = script::parse(script).unwrap();
        replay(&commands, RadialLayout::default(), catalog())
    }

    #[test]
    fn test_replay_hover_and_select() {
        let events = run("down 500 500\nhover i1\nhover i2\nhover i2\nup");
        assert_eq!(
            events,
            vec![
                "opened",
                "activated i1",
                "deactivated i1",
                "activated i2",
                "selected i2",
                "deactivated i2",
                "closed",
            ]
        );
    }

    #[test]
    fn test_replay_decline_and_empty_items() {
        assert_eq!(
            run("decline\ndown 1 1\nmove 2 2\nup"),
            vec!["suppressed declined"]
        );

        let commands = script::parse("down 1 1\nup").unwrap();
        assert_eq!(
            replay(&commands, RadialLayout::default(), Vec::new()),
            vec!["suppressed no-items"]
        );
    }

    #[test]
    fn test_replay_cancel_never_selects() {
        let events = run("down 500 500\nhover i1\ncancel");
        assert_eq!(events, vec!["opened", "activated i1", "deactivated i1", "closed"]);
    }

    #[test]
    fn test_replay_preset_items() {
        let events = run("items i2,extra\ndown 0 0\nhover extra\nup\ndown 0 0\nhover extra\nup");
        assert_eq!(
            events,
            vec![
                "opened",
                "activated extra",
                "selected extra",
                "deactivated extra",
                "closed",
                // second press falls back to the catalog, which has no "extra"
                "opened",
                "closed",
            ]
        );
    }

    #[test]
    fn test_replay_reset_drops_preset_items() {
        let events = run("items extra\nreset\ndown 0 0\nhover i1\nup");
        assert_eq!(
            events,
            vec![
                "opened",
                "activated i1",
                "selected i1",
                "deactivated i1",
                "closed"
            ]
        );
    }
}
