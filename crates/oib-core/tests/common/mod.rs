pub mod scripted_prompter;
