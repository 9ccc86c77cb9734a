mod availability;
mod conflict;
mod error;
mod mutations;
mod queries;

pub use availability::{filter_available, occupied_rooms, type_matches};
pub use error::EngineError;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot, RwLock};
use ulid::Ulid;

use crate::model::*;
use crate::wal::Wal;

pub type SharedRoomState = Arc<RwLock<RoomState>>;

// ── Group-commit WAL channel ─────────────────────────────

pub(super) enum WalCommand {
    Append {
        event: Event,
        response: oneshot::Sender<io::Result<()>>,
    },
    Compact {
        events: Vec<Event>,
        response: oneshot::Sender<io::Result<()>>,
    },
    AppendsSinceCompact {
        response: oneshot::Sender<u64>,
    },
}

/// Background task that owns the WAL and batches appends for group commit.
/// 1. Block until the first Append arrives.
/// 2. Buffer it (no fsync).
/// 3. Drain all immediately available Appends (the batch window).
/// 4. Single flush_sync for the whole batch.
/// 5. Respond Ok to all senders.
async fn wal_writer_loop(mut wal: Wal, mut rx: mpsc::Receiver<WalCommand>) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            WalCommand::Append { event, response } => {
                let mut batch = vec![(event, response)];

                // Drain all immediately available appends
                loop {
                    match rx.try_recv() {
                        Ok(WalCommand::Append { event, response }) => {
                            batch.push((event, response));
                        }
                        Ok(other) => {
                            // Flush current batch first, then handle the non-append command
                            flush_and_respond(&mut wal, &mut batch);
                            handle_non_append(&mut wal, other);
                            break;
                        }
                        Err(_) => break, // channel empty — flush batch
                    }
                }

                if !batch.is_empty() {
                    flush_and_respond(&mut wal, &mut batch);
                }
            }
            other => handle_non_append(&mut wal, other),
        }
    }
}

fn flush_and_respond(wal: &mut Wal, batch: &mut Vec<(Event, oneshot::Sender<io::Result<()>>)>) {
    metrics::histogram!(crate::observability::WAL_FLUSH_BATCH_SIZE).record(batch.len() as f64);
    let flush_start = std::time::Instant::now();
    let result = flush_batch(wal, batch);
    metrics::histogram!(crate::observability::WAL_FLUSH_DURATION_SECONDS)
        .record(flush_start.elapsed().as_secs_f64());
    for (_, tx) in batch.drain(..) {
        let r = match &result {
            Ok(()) => Ok(()),
            Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
        };
        let _ = tx.send(r);
    }
}

fn flush_batch(
    wal: &mut Wal,
    batch: &[(Event, oneshot::Sender<io::Result<()>>)],
) -> io::Result<()> {
    let mut append_err: Option<io::Error> = None;
    for (event, _) in batch.iter() {
        if let Err(e) = wal.append_buffered(event) {
            append_err = Some(e);
            break;
        }
    }
    // Always flush — even on append error — so partially buffered bytes
    // don't leak into the next batch (callers were told this batch failed).
    let flush_err = wal.flush_sync().err();
    if let Some(e) = append_err {
        return Err(e);
    }
    if let Some(e) = flush_err {
        return Err(e);
    }
    Ok(())
}

fn handle_non_append(wal: &mut Wal, cmd: WalCommand) {
    match cmd {
        WalCommand::Compact { events, response } => {
            let result = Wal::write_compact_file(wal.path(), &events)
                .and_then(|()| wal.swap_compact_file());
            let _ = response.send(result);
        }
        WalCommand::AppendsSinceCompact { response } => {
            let _ = response.send(wal.appends_since_compact());
        }
        WalCommand::Append { .. } => unreachable!(),
    }
}

/// The booking store: room inventory, registered users, and all bookings,
/// rebuilt from the WAL on startup. Rooms own their bookings; two reverse
/// indexes resolve a booking id or confirmation code back to its room.
pub struct Engine {
    pub(super) rooms: DashMap<Ulid, SharedRoomState>,
    pub(super) users: DashMap<Ulid, User>,
    pub(super) wal_tx: mpsc::Sender<WalCommand>,
    /// Reverse lookup: booking id → room id.
    pub(super) booking_to_room: DashMap<Ulid, Ulid>,
    /// Reverse lookup: confirmation code → booking id.
    pub(super) code_to_booking: DashMap<String, Ulid>,
}

/// Apply a booking event directly to a RoomState (no locking — caller holds
/// the lock) and keep the reverse indexes in step.
fn apply_to_room(
    rs: &mut RoomState,
    event: &Event,
    booking_to_room: &DashMap<Ulid, Ulid>,
    code_to_booking: &DashMap<String, Ulid>,
) {
    match event {
        Event::BookingCreated {
            id,
            room_id,
            user_id,
            stay,
            adults,
            children,
            confirmation_code,
        } => {
            rs.insert_booking(BookingRecord {
                id: *id,
                user_id: *user_id,
                stay: *stay,
                adults: *adults,
                children: *children,
                confirmation_code: confirmation_code.clone(),
            });
            booking_to_room.insert(*id, *room_id);
            code_to_booking.insert(confirmation_code.clone(), *id);
        }
        Event::BookingCancelled { id, .. } => {
            if let Some(removed) = rs.remove_booking(*id) {
                code_to_booking.remove(&removed.confirmation_code);
            }
            booking_to_room.remove(id);
        }
        // RoomAdded/UserRegistered are handled at the map level, not here
        Event::RoomAdded { .. } | Event::UserRegistered { .. } => {}
    }
}

impl Engine {
    pub fn new(wal_path: PathBuf) -> io::Result<Self> {
        let events = Wal::replay(&wal_path)?;
        let wal = Wal::open(&wal_path)?;
        let (wal_tx, wal_rx) = mpsc::channel(4096);
        tokio::spawn(wal_writer_loop(wal, wal_rx));

        let engine = Self {
            rooms: DashMap::new(),
            users: DashMap::new(),
            wal_tx,
            booking_to_room: DashMap::new(),
            code_to_booking: DashMap::new(),
        };

        // Replay events — we're the sole owner of these Arcs, so try_write
        // always succeeds instantly (no contention). Never use blocking_write
        // here because this may run inside an async context.
        for event in &events {
            match event {
                Event::RoomAdded {
                    id,
                    room_type,
                    price_per_night,
                    description,
                    photo_url,
                } => {
                    let rs = RoomState::new(
                        *id,
                        room_type.clone(),
                        *price_per_night,
                        description.clone(),
                        photo_url.clone(),
                    );
                    engine.rooms.insert(*id, Arc::new(RwLock::new(rs)));
                }
                Event::UserRegistered { id, name, email, phone } => {
                    engine.users.insert(
                        *id,
                        User {
                            id: *id,
                            name: name.clone(),
                            email: email.clone(),
                            phone: phone.clone(),
                        },
                    );
                }
                other => {
                    let room_id = event_room_id(other);
                    if let Some(room_id) = room_id
                        && let Some(entry) = engine.rooms.get(&room_id) {
                            let rs_arc = entry.clone();
                            let mut guard = rs_arc.try_write().expect("replay: uncontended write");
                            apply_to_room(
                                &mut guard,
                                other,
                                &engine.booking_to_room,
                                &engine.code_to_booking,
                            );
                        }
                }
            }
        }

        Ok(engine)
    }

    /// Write event to WAL via the background group-commit writer.
    pub(super) async fn wal_append(&self, event: &Event) -> Result<(), EngineError> {
        let (tx, rx) = oneshot::channel();
        self.wal_tx
            .send(WalCommand::Append {
                event: event.clone(),
                response: tx,
            })
            .await
            .map_err(|_| EngineError::StoreUnavailable("WAL writer shut down".into()))?;
        rx.await
            .map_err(|_| EngineError::StoreUnavailable("WAL writer dropped response".into()))?
            .map_err(|e| EngineError::StoreUnavailable(e.to_string()))
    }

    pub fn get_room_state(&self, id: &Ulid) -> Option<SharedRoomState> {
        self.rooms.get(id).map(|e| e.value().clone())
    }

    pub fn room_for_booking(&self, booking_id: &Ulid) -> Option<Ulid> {
        self.booking_to_room.get(booking_id).map(|e| *e.value())
    }

    /// WAL-append + apply in one call. Eliminates the repeated pattern in
    /// every booking mutation.
    pub(super) async fn persist_and_apply(
        &self,
        rs: &mut RoomState,
        event: &Event,
    ) -> Result<(), EngineError> {
        self.wal_append(event).await?;
        apply_to_room(rs, event, &self.booking_to_room, &self.code_to_booking);
        Ok(())
    }

    /// Lookup booking → room, get room, acquire write lock.
    pub(super) async fn resolve_booking_write(
        &self,
        booking_id: &Ulid,
    ) -> Result<(Ulid, tokio::sync::OwnedRwLockWriteGuard<RoomState>), EngineError> {
        let room_id = self
            .room_for_booking(booking_id)
            .ok_or(EngineError::BookingNotFound(*booking_id))?;
        let rs = self
            .get_room_state(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        let guard = rs.write_owned().await;
        Ok((room_id, guard))
    }

    /// Snapshot the room-state Arcs without holding any map shard across an
    /// await point.
    pub(super) fn room_states(&self) -> Vec<SharedRoomState> {
        self.rooms.iter().map(|e| e.value().clone()).collect()
    }
}

/// Extract the room_id from a booking event (None for map-level events).
fn event_room_id(event: &Event) -> Option<Ulid> {
    match event {
        Event::BookingCreated { room_id, .. } | Event::BookingCancelled { room_id, .. } => {
            Some(*room_id)
        }
        Event::RoomAdded { .. } | Event::UserRegistered { .. } => None,
    }
}
