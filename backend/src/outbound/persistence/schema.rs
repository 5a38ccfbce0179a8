//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. They are used by Diesel
//! for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When a migration changes the schema, update this file alongside it. The
//! `diesel print-schema` command can generate these definitions from a live
//! database.

diesel::table! {
    /// Registered doctors.
    ///
    /// `name_key` holds the lowercased name and carries the unique constraint
    /// that makes names case-insensitively unique.
    doctors (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name as entered (max 20 characters).
        name -> Varchar,
        /// Lowercased name used for uniqueness.
        name_key -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Dates on which a doctor cannot work.
    doctor_days_off (doctor_id, day_off) {
        doctor_id -> Uuid,
        day_off -> Date,
    }
}

diesel::table! {
    /// One schedule per calendar month.
    schedules (id) {
        id -> Uuid,
        /// Month index, 1 to 12.
        month -> Int2,
        year -> Int4,
        /// One of `draft`, `generated`, `failed`, `finalized`.
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-day staffing bounds explicitly set for a schedule.
    ///
    /// Days without a row fall back to the default bounds.
    resource_bounds (schedule_id, day) {
        schedule_id -> Uuid,
        /// Day of month, 1 to 31.
        day -> Int2,
        min_staff -> Int4,
        max_staff -> Int4,
    }
}

diesel::table! {
    /// Generated shift assignments. At most one per doctor per date.
    shift_assignments (id) {
        id -> Uuid,
        schedule_id -> Uuid,
        doctor_id -> Uuid,
        shift_date -> Date,
    }
}

diesel::joinable!(doctor_days_off -> doctors (doctor_id));
diesel::joinable!(resource_bounds -> schedules (schedule_id));
diesel::joinable!(shift_assignments -> schedules (schedule_id));
diesel::joinable!(shift_assignments -> doctors (doctor_id));

diesel::allow_tables_to_appear_in_same_query!(
    doctors,
    doctor_days_off,
    schedules,
    resource_bounds,
    shift_assignments,
);
