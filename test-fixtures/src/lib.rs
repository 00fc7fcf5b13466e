//! Raw source-payload builders shared by tests across the workspace.
//!
//! Each builder returns the JSON shape the source system emits for that
//! entity, with sensible defaults; tests tweak fields via the returned
//! `Value` when they need edge cases.

use serde_json::{json, Value};

pub fn raw_teacher(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name, "email": format!("{id}@school.example") })
}

pub fn raw_student(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name, "email": format!("{id}@students.example"), "status": "active" })
}

pub fn raw_program(id: &str, name: &str, price: &str) -> Value {
    json!({ "id": id, "Product_Name": name, "Price": price })
}

pub fn raw_class(id: &str, name: &str, teacher_id: &str) -> Value {
    json!({ "id": id, "name": name, "teacher_id": teacher_id, "status": "open" })
}

pub fn raw_registration(id: &str, student_id: &str) -> Value {
    json!({ "id": id, "student_id": student_id, "program_name": "Intro", "amount": "100", "status": "confirmed" })
}

pub fn raw_enrollment(id: &str, student_id: &str, class_id: &str) -> Value {
    json!({ "id": id, "student_id": student_id, "class_id": class_id, "status": "enrolled" })
}

pub fn raw_payment(id: &str, registration_id: &str, amount: &str) -> Value {
    json!({ "id": id, "registration_id": registration_id, "amount": amount, "status": "paid" })
}

pub fn raw_grade(id: &str, enrollment_id: &str, score: &str) -> Value {
    json!({ "id": id, "enrollment_id": enrollment_id, "score": score })
}

pub fn raw_unit(id: &str, class_id: &str, name: &str) -> Value {
    json!({ "id": id, "class_id": class_id, "name": name, "sequence": "1" })
}

pub fn raw_request(id: &str, student_id: &str) -> Value {
    json!({ "id": id, "student_id": student_id, "subject": "transfer", "status": "open" })
}
