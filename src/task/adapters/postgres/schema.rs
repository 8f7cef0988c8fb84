//! Diesel schema for task assignment persistence.

diesel::table! {
    /// Users tasks are assigned to.
    users (id) {
        /// External user identifier.
        id -> Uuid,
        /// Unique, lowercase email address.
        #[max_length = 254]
        email -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Administrator flag.
        is_admin -> Bool,
        /// Staff flag.
        is_staff -> Bool,
        /// Superuser flag.
        is_superuser -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task records and their lifecycle status.
    tasks (id) {
        /// External task identifier.
        id -> Uuid,
        /// Task name.
        #[max_length = 255]
        name -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Assignee, if any.
        assigned_to -> Nullable<Uuid>,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Priority classification.
        #[max_length = 20]
        task_type -> Varchar,
        /// Optional deadline.
        deadline -> Nullable<Timestamptz>,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Soft-delete flag.
        deleted -> Bool,
        /// Optimistic concurrency revision.
        revision -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> users (assigned_to));
diesel::allow_tables_to_appear_in_same_query!(tasks, users);
