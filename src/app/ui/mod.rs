mod controls;
mod details;
mod legend;
mod modal;
mod panels;
