//! Static reference data: doctors and operating rooms.
//!
//! The store never reads these; they only narrow the choices offered by the
//! operation form.

use serde::{Deserialize, Serialize};

/// A doctor who can be assigned to operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    /// Specialization (e.g., "Cardiology")
    pub specialization: String,
    pub available: bool,
}

/// An operating room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationRoom {
    pub id: String,
    /// Room name as written on operations (e.g., "OR-1")
    pub name: String,
    /// Room kind (e.g., "Cardiac", "General")
    #[serde(rename = "type")]
    pub room_type: String,
    pub available: bool,
}

/// Doctor and room lists consumed by the form layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReferenceData {
    pub doctors: Vec<Doctor>,
    pub rooms: Vec<OperationRoom>,
}

impl ReferenceData {
    pub fn new(doctors: Vec<Doctor>, rooms: Vec<OperationRoom>) -> Self {
        Self { doctors, rooms }
    }

    /// Doctors that can be offered for a new booking.
    pub fn available_doctors(&self) -> impl Iterator<Item = &Doctor> {
        self.doctors.iter().filter(|doctor| doctor.available)
    }

    /// Rooms that can be offered for a new booking.
    pub fn available_rooms(&self) -> impl Iterator<Item = &OperationRoom> {
        self.rooms.iter().filter(|room| room.available)
    }

    pub fn doctor_by_name(&self, name: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|doctor| doctor.name == name)
    }

    pub fn room_by_name(&self, name: &str) -> Option<&OperationRoom> {
        self.rooms.iter().find(|room| room.name == name)
    }
}
