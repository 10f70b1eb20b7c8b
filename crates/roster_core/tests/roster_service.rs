use roster_core::db::{open_db, open_db_in_memory, DbError};
use roster_core::{
    Location, Person, PersonDraft, PersonPatch, PersonValidationError, QuickAssignError,
    RepoError, RepoResult, Role, Roster, RosterRepository, RosterService, ServiceError,
    SqliteRosterRepository, ZoneId, ZoneRegistry, ROSTER_STORAGE_KEY,
};
use rusqlite::{params, Connection};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use uuid::Uuid;

fn open_service(conn: &Connection) -> RosterService<SqliteRosterRepository<'_>> {
    let repo = SqliteRosterRepository::try_new(conn).unwrap();
    RosterService::open(repo, ZoneRegistry::default()).unwrap()
}

fn draft(name: &str, role: Role) -> PersonDraft {
    PersonDraft::new(name, role, "new@ws.com", "06 11 22 33 44")
}

fn refresh_counter<R: RosterRepository>(service: &mut RosterService<R>) -> Rc<Cell<u32>> {
    let counter = Rc::new(Cell::new(0));
    let observed = Rc::clone(&counter);
    service.subscribe(move || observed.set(observed.get() + 1));
    counter
}

fn stored_roster_json(conn: &Connection) -> String {
    conn.query_row(
        "SELECT value FROM local_storage WHERE key = ?1;",
        [ROSTER_STORAGE_KEY],
        |row| row.get(0),
    )
    .unwrap()
}

/// In-memory repository whose saves can be switched to fail.
#[derive(Clone, Default)]
struct SwitchableRepo {
    stored: Rc<RefCell<Option<Vec<Person>>>>,
    fail_saves: Rc<Cell<bool>>,
}

impl RosterRepository for SwitchableRepo {
    fn load_roster(&self, _registry: &ZoneRegistry) -> RepoResult<Option<Roster>> {
        Ok(self.stored.borrow().clone().map(Roster::new))
    }

    fn save_roster(&self, persons: &[Person]) -> RepoResult<()> {
        if self.fail_saves.get() {
            return Err(RepoError::Db(DbError::Sqlite(
                rusqlite::Error::ExecuteReturnedResults,
            )));
        }
        *self.stored.borrow_mut() = Some(persons.to_vec());
        Ok(())
    }

    fn clear_roster(&self) -> RepoResult<()> {
        *self.stored.borrow_mut() = None;
        Ok(())
    }
}

#[test]
fn first_open_seeds_and_persists_demo_roster() {
    let conn = open_db_in_memory().unwrap();
    let service = open_service(&conn);

    assert_eq!(service.roster().len(), 5);
    let stored: serde_json::Value = serde_json::from_str(&stored_roster_json(&conn)).unwrap();
    assert_eq!(stored.as_array().unwrap().len(), 5);
    assert_eq!(stored[0]["name"], "Alice Dupont");
    assert_eq!(stored[0]["role"], "receptionist");
    assert_eq!(stored[0]["location"], "reception");
    assert_eq!(stored[4]["location"], "unassigned");
}

#[test]
fn add_then_delete_restores_roster() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    let before = service.roster().clone();

    let id = service.add_person(draft("Nina", Role::Hr)).unwrap();
    let added = service.person(id).unwrap();
    assert_eq!(added.location, Location::Unassigned);
    assert_eq!(service.roster().len(), before.len() + 1);

    assert!(service.delete_person(id).unwrap());
    assert_eq!(service.roster(), &before);
}

#[test]
fn add_rejects_invalid_input_without_mutation() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    let refreshes = refresh_counter(&mut service);

    let err = service
        .add_person(PersonDraft::new("Nina", Role::Hr, "nina@ws.com", "12345"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidInput(PersonValidationError::InvalidPhone(_))
    ));
    assert_eq!(service.roster().len(), 5);
    assert_eq!(refreshes.get(), 0);
}

#[test]
fn empty_update_leaves_record_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    let id = service.roster().persons()[0].id;
    let before = service.person(id).unwrap().clone();

    assert!(service.update_person(id, PersonPatch::default()).unwrap());
    assert_eq!(service.person(id).unwrap(), &before);
}

#[test]
fn update_merges_present_fields_only() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    let id = service.roster().persons()[1].id;

    let patch = PersonPatch {
        email: Some("robert@ws.com".to_string()),
        photo_url: Some(Some("https://example.test/bob.png".to_string())),
        ..PersonPatch::default()
    };
    assert!(service.update_person(id, patch).unwrap());

    let person = service.person(id).unwrap();
    assert_eq!(person.email, "robert@ws.com");
    assert_eq!(person.photo_url.as_deref(), Some("https://example.test/bob.png"));
    assert_eq!(person.name, "Bob Martin");
    assert_eq!(person.location, Location::zone("servers"));
}

#[test]
fn update_and_move_on_missing_id_are_silent_noops() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    let refreshes = refresh_counter(&mut service);
    let missing = Uuid::new_v4();

    let patch = PersonPatch {
        name: Some("Ghost".to_string()),
        ..PersonPatch::default()
    };
    assert!(!service.update_person(missing, patch).unwrap());
    assert!(!service.move_person(missing, Location::zone("staff")).unwrap());
    assert_eq!(refreshes.get(), 0);
}

#[test]
fn delete_missing_id_still_persists_and_signals() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    let refreshes = refresh_counter(&mut service);

    assert!(!service.delete_person(Uuid::new_v4()).unwrap());
    assert!(!service.delete_person(Uuid::new_v4()).unwrap());
    assert_eq!(refreshes.get(), 2);
    assert_eq!(service.roster().len(), 5);
}

#[test]
fn move_person_skips_rules_but_rejects_unknown_zones() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    let evan = service.roster().persons()[4].id;

    // Developer is not on the server room list; move does not check.
    assert!(service.move_person(evan, Location::zone("servers")).unwrap());
    assert_eq!(service.person(evan).unwrap().location, Location::zone("servers"));

    let err = service.move_person(evan, Location::zone("moon")).unwrap_err();
    assert!(matches!(err, ServiceError::UnknownZone(zone) if zone == ZoneId::new("moon")));
}

#[test]
fn try_move_applies_rules_before_moving() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    let refreshes = refresh_counter(&mut service);
    let evan = service.roster().persons()[4].id;

    let denied = service.try_move_person(evan, Location::zone("reception")).unwrap();
    assert!(!denied.allowed);
    assert!(service.person(evan).unwrap().is_unassigned());
    assert_eq!(refreshes.get(), 0);

    let allowed = service.try_move_person(evan, Location::zone("archives")).unwrap();
    assert!(allowed.allowed);
    assert_eq!(service.person(evan).unwrap().location, Location::zone("archives"));
    assert_eq!(refreshes.get(), 1);
}

#[test]
fn mutations_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.db");

    let id = {
        let conn = open_db(&path).unwrap();
        let mut service = open_service(&conn);
        let id = service.add_person(draft("Nina", Role::Hr)).unwrap();
        service.move_person(id, Location::zone("staff")).unwrap();
        id
    };

    let conn = open_db(&path).unwrap();
    let service = open_service(&conn);
    assert_eq!(service.roster().len(), 6);
    assert_eq!(service.person(id).unwrap().location, Location::zone("staff"));
}

#[test]
fn quick_assign_places_first_eligible_unassigned_person() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    let cleaner = service.add_person(draft("Carl", Role::Cleaner)).unwrap();

    // Evan (developer) comes first but is not allowed at reception.
    let placed = service.quick_assign(&ZoneId::new("reception")).unwrap();
    assert_eq!(placed.person_id, cleaner);
    assert_eq!(placed.person_name, "Carl");
    assert_eq!(placed.zone_name, "Reception");
    assert_eq!(service.person(cleaner).unwrap().location, Location::zone("reception"));
}

#[test]
fn quick_assign_reports_full_zone_and_missing_candidates() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    let receptionist = service.add_person(draft("Rita", Role::Receptionist)).unwrap();
    service.move_person(receptionist, Location::zone("reception")).unwrap();

    let err = service.quick_assign(&ZoneId::new("reception")).unwrap_err();
    assert!(matches!(err, QuickAssignError::ZoneFull { capacity: 2, .. }));

    let err = service.quick_assign(&ZoneId::new("security")).unwrap_err();
    assert!(matches!(err, QuickAssignError::NoEligibleStaff { .. }));

    let err = service.quick_assign(&ZoneId::new("attic")).unwrap_err();
    assert!(matches!(err, QuickAssignError::UnknownZone(_)));
}

#[test]
fn mandatory_alerts_follow_occupancy() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    assert!(service.mandatory_alerts().iter().all(|alert| !alert.empty));

    let alice = service.roster().persons()[0].id;
    service.unassign_person(alice).unwrap();

    let alerts = service.mandatory_alerts();
    let reception = alerts
        .iter()
        .find(|alert| alert.zone_id == ZoneId::new("reception"))
        .unwrap();
    assert!(reception.empty);
    let security = alerts
        .iter()
        .find(|alert| alert.zone_id == ZoneId::new("security"))
        .unwrap();
    assert!(!security.empty);
}

#[test]
fn reset_restores_demo_roster_and_signals() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    let seeded = service.roster().clone();
    let refreshes = refresh_counter(&mut service);

    service.add_person(draft("Nina", Role::Hr)).unwrap();
    service.reset_to_defaults().unwrap();

    assert_eq!(service.roster(), &seeded);
    assert_eq!(refreshes.get(), 2);
    let stored: serde_json::Value = serde_json::from_str(&stored_roster_json(&conn)).unwrap();
    assert_eq!(stored.as_array().unwrap().len(), 5);
}

#[test]
fn malformed_storage_is_rejected_unless_reset_is_requested() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO local_storage (key, value) VALUES (?1, ?2);",
        params![ROSTER_STORAGE_KEY, "{not json"],
    )
    .unwrap();

    let repo = SqliteRosterRepository::try_new(&conn).unwrap();
    let err = RosterService::open(repo, ZoneRegistry::default()).err().unwrap();
    assert!(matches!(err, ServiceError::Repo(RepoError::InvalidData(_))));
    assert_eq!(stored_roster_json(&conn), "{not json");

    let repo = SqliteRosterRepository::try_new(&conn).unwrap();
    let service = RosterService::open_with_reset(repo, ZoneRegistry::default()).unwrap();
    assert_eq!(service.roster().len(), 5);
}

#[test]
fn stored_location_outside_registry_is_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRosterRepository::try_new(&conn).unwrap();
    let json = format!(
        r#"[{{"id":"{}","name":"Zed","role":"developer","location":"moon","email":"z@ws.com","phone":"0600000000"}}]"#,
        Uuid::new_v4()
    );
    conn.execute(
        "INSERT INTO local_storage (key, value) VALUES (?1, ?2);",
        params![ROSTER_STORAGE_KEY, json],
    )
    .unwrap();

    let err = repo.load_roster(&ZoneRegistry::default()).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("moon")));
}

#[test]
fn search_matches_name_and_role() {
    let conn = open_db_in_memory().unwrap();
    let service = open_service(&conn);

    let matches = service.search("manager");
    assert_eq!(matches.items.len(), 1);
    assert_eq!(matches.items[0].name, "Diana Boss");
    assert_eq!(matches.unassigned_count, 0);
}

#[test]
fn invalid_patch_on_missing_id_is_a_silent_noop() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    let refreshes = refresh_counter(&mut service);

    let patch = PersonPatch {
        email: Some("not-an-email".to_string()),
        ..PersonPatch::default()
    };
    assert!(!service.update_person(Uuid::new_v4(), patch).unwrap());
    assert_eq!(refreshes.get(), 0);
}

#[test]
fn failed_reset_keeps_stored_and_in_memory_roster() {
    let repo = SwitchableRepo::default();
    let mut service = RosterService::open(repo.clone(), ZoneRegistry::default()).unwrap();
    let id = service.add_person(draft("Nina", Role::Hr)).unwrap();
    let before = service.roster().clone();
    let refreshes = refresh_counter(&mut service);

    repo.fail_saves.set(true);
    let err = service.reset_to_defaults().unwrap_err();
    assert!(matches!(err, ServiceError::Repo(RepoError::Db(_))));

    assert_eq!(service.roster(), &before);
    assert!(service.person(id).is_some());
    assert_eq!(repo.stored.borrow().as_deref(), Some(before.persons()));
    assert_eq!(refreshes.get(), 0);

    repo.fail_saves.set(false);
    service.reset_to_defaults().unwrap();
    assert_eq!(service.roster().len(), 5);
    assert_eq!(repo.stored.borrow().as_ref().map(Vec::len), Some(5));
    assert_eq!(refreshes.get(), 1);
}

#[test]
fn failed_save_rolls_back_add() {
    let repo = SwitchableRepo::default();
    let mut service = RosterService::open(repo.clone(), ZoneRegistry::default()).unwrap();
    let refreshes = refresh_counter(&mut service);

    repo.fail_saves.set(true);
    assert!(service.add_person(draft("Nina", Role::Hr)).is_err());
    assert_eq!(service.roster().len(), 5);
    assert_eq!(refreshes.get(), 0);
}
