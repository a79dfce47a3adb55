// Education-domain resources served by the placeholder CRUD routes

/// A resource mounted at `/api/<path>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// URL segment, also used in logs
    pub path: &'static str,
    /// Plural label used in messages
    pub label: &'static str,
    /// Singular label used in messages
    pub singular: &'static str,
}

pub const RESOURCES: &[ResourceDescriptor] = &[
    ResourceDescriptor { path: "classes", label: "Classes", singular: "Class" },
    ResourceDescriptor { path: "students", label: "Students", singular: "Student" },
    ResourceDescriptor { path: "teachers", label: "Teachers", singular: "Teacher" },
    ResourceDescriptor { path: "courses", label: "Courses", singular: "Course" },
    ResourceDescriptor { path: "schedules", label: "Schedules", singular: "Schedule" },
    ResourceDescriptor { path: "exams", label: "Exams", singular: "Exam" },
    ResourceDescriptor { path: "grades", label: "Grades", singular: "Grade" },
    ResourceDescriptor { path: "attendance", label: "Attendance records", singular: "Attendance record" },
    ResourceDescriptor { path: "homework", label: "Homework assignments", singular: "Homework assignment" },
    ResourceDescriptor { path: "notices", label: "Notices", singular: "Notice" },
];
