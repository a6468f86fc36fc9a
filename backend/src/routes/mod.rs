pub mod exam_times;
pub mod exam_window;
pub mod settings;
pub mod subjects;
