//! Diesel table definitions mirroring `backend/migrations`.

diesel::table! {
    /// Registered student accounts.
    students (id) {
        /// Student identifier chosen at registration.
        #[max_length = 100]
        id -> Varchar,
        /// PHC-format password digest.
        #[max_length = 200]
        password_hash -> Varchar,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Lab catalogue seeded at bootstrap.
    labs (id) {
        /// Surrogate key.
        id -> Int4,
        /// Unique display name.
        name -> Text,
        /// Supervising staff.
        staff -> Nullable<Text>,
        /// Advertised capacity.
        capacity -> Nullable<Int4>,
    }
}

diesel::table! {
    /// One row per (student, priority) ranking.
    choices (id) {
        /// Surrogate key.
        id -> Int4,
        /// Owning student.
        #[max_length = 100]
        student_id -> Varchar,
        /// Ranked lab.
        lab_id -> Int4,
        /// Rank position 1..=3.
        priority -> Int2,
    }
}

diesel::joinable!(choices -> students (student_id));
diesel::joinable!(choices -> labs (lab_id));

diesel::allow_tables_to_appear_in_same_query!(students, labs, choices);
