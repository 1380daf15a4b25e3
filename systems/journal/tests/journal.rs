use overworld_core::{Command, Displacement, EncounterEvent, Event, Level, MapId, Point, SpeciesId};
use overworld_system_journal::{Checkpoint, Journal};

fn moved(from: (i32, i32), to: (i32, i32)) -> Event {
    let displacement = Displacement::new(to.0 - from.0, to.1 - from.1);
    Event::PlayerMoved {
        from: Point::new(from.0, from.1),
        to: Point::new(to.0, to.1),
        requested: displacement,
        resolved: displacement,
    }
}

fn encounter(species: u32, level: u32) -> EncounterEvent {
    EncounterEvent::new(SpeciesId::new(species), Level::new(level))
}

#[test]
fn movement_updates_the_checkpoint_position() {
    let mut journal = Journal::starting_at(Checkpoint::new(MapId::new(0), Point::new(10, 10)));

    journal.handle(&[Event::TimeAdvanced { tick: 1 }, moved((10, 10), (15, 10))]);

    assert_eq!(
        journal.checkpoint(),
        Some(Checkpoint::new(MapId::new(0), Point::new(15, 10))),
        "journal should follow the player's committed position",
    );
}

#[test]
fn entering_a_map_replaces_the_checkpoint() {
    let mut journal = Journal::starting_at(Checkpoint::new(MapId::new(0), Point::new(90, 100)));

    journal.handle(&[
        moved((90, 100), (105, 100)),
        Event::MapEntered {
            from: MapId::new(0),
            to: MapId::new(2),
            position: Point::new(40, 480),
        },
    ]);

    assert_eq!(
        journal.checkpoint(),
        Some(Checkpoint::new(MapId::new(2), Point::new(40, 480)))
    );
}

#[test]
fn encounters_queue_until_taken_in_order() {
    let mut journal = Journal::default();

    journal.handle(&[Event::EncounterTriggered {
        encounter: encounter(1, 3),
    }]);
    journal.handle(&[Event::EncounterTriggered {
        encounter: encounter(2, 5),
    }]);

    assert_eq!(
        journal.take_encounters(),
        vec![encounter(1, 3), encounter(2, 5)]
    );
    assert!(journal.take_encounters().is_empty());
}

#[test]
fn restore_emits_a_teleport_to_the_checkpoint() {
    let mut journal = Journal::starting_at(Checkpoint::new(MapId::new(1), Point::new(7, 8)));
    journal.handle(&[Event::TeleportRejected {
        map: MapId::new(9),
        position: Point::new(0, 0),
    }]);
    let mut commands = Vec::new();

    journal.restore(&mut commands);

    assert_eq!(
        commands,
        vec![Command::Teleport {
            map: MapId::new(1),
            position: Point::new(7, 8),
        }],
        "rejected teleports must not disturb the stored checkpoint",
    );
}
