//! Interactive shell: the text menu over the auth core.
//!
//! Thin by design. Session state is a plain loop value (anonymous menu vs
//! authenticated command loop); every check and mutation happens inside
//! `AuthManager`, this module only prompts and prints.

use std::io::{self, Write};

use crate::account::Role;
use crate::authz::Action;
use crate::error::AuthError;
use crate::manager::AuthManager;

pub fn run(manager: &mut AuthManager) {
    print_banner();
    loop {
        println!("\nChoose an action: login / register / exit");
        let choice = prompt("> ");
        match choice.as_str() {
            "login" => {
                if let Some(username) = login(manager) {
                    command_loop(manager, username);
                }
            }
            "register" => register(manager),
            "exit" => {
                println!("👋 Bye.");
                break;
            }
            "" => {}
            _ => println!("❌ Unknown command!"),
        }
    }
}

fn print_banner() {
    println!("========================================");
    println!("            KEYFORT  CONSOLE            ");
    println!("========================================");
}

pub fn prompt(msg: &str) -> String {
    print!("{}", msg);
    io::stdout().flush().unwrap();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).unwrap_or(0) == 0 {
        // EOF on stdin: nothing more will ever arrive
        println!();
        std::process::exit(0);
    }
    line.trim().to_string()
}

fn register(manager: &mut AuthManager) {
    let username = prompt("Choose a login: ");
    let password = prompt("Choose a password: ");
    report(manager.register(&username, &password), "Account created!");
}

fn login(manager: &mut AuthManager) -> Option<String> {
    let username = prompt("Login: ");
    let password = prompt("Password: ");
    match manager.authenticate(&username, &password) {
        Ok(account) => {
            println!("✅ Logged in as '{}'.", account.username);
            Some(account.username)
        }
        Err(e) => {
            fail(e);
            None
        }
    }
}

fn command_loop(manager: &mut AuthManager, mut username: String) {
    loop {
        // Re-read the account each turn; a command may have renamed,
        // demoted or even deleted it.
        let account = match manager.account(&username) {
            Some(a) => a,
            None => {
                println!("Account '{}' no longer exists. Logging out.", username);
                return;
            }
        };

        let command = prompt("\n💻 Command (help for the list): ");
        match command.as_str() {
            "help" => print_help(manager, account.role),
            "whoami" => print_account_line(&account.username, account.role, account.banned),
            "changepass" => {
                let old = prompt("🔐 Old password: ");
                let new = prompt("🔑 New password: ");
                let confirm = prompt("🔑 Repeat new password: ");
                report(
                    manager.change_password(&username, &old, &new, &confirm),
                    "Password changed!",
                );
            }
            "showusers" => match manager.list_accounts(&username) {
                Ok(accounts) => {
                    println!("📜 All accounts:");
                    for account in accounts {
                        print_account_line(&account.username, account.role, account.banned);
                    }
                }
                Err(e) => fail(e),
            },
            "banuser" => {
                let target = prompt("Login to ban/unban: ");
                match manager.toggle_ban(&username, &target) {
                    Ok(true) => println!("✅ '{}' is now banned.", target),
                    Ok(false) => println!("✅ '{}' is now unbanned.", target),
                    Err(e) => fail(e),
                }
            }
            "setperm" => {
                let target = prompt("Login: ");
                let role = prompt("New role (user/vip/admin): ");
                report(
                    manager.set_role(&username, &target, &role).map(|_| ()),
                    "Role updated!",
                );
            }
            "deluser" => {
                let target = prompt("Login to delete: ");
                report(manager.delete_account(&username, &target), "User deleted.");
            }
            "setlogin" => {
                let new_name = prompt("New login: ");
                match manager.rename_self(&username, &new_name) {
                    Ok(()) => {
                        println!("✅ Login changed to '{}'.", new_name);
                        username = new_name;
                    }
                    Err(e) => fail(e),
                }
            }
            "giftvip" => {
                let target = prompt("Gift vip to: ");
                report(manager.gift_vip(&username, &target), "Vip role gifted!");
            }
            "unlock" => {
                let target = prompt("Login to unlock: ");
                report(manager.unlock_user(&username, &target), "User unlocked.");
            }
            "showlog" => match manager.audit_tail(&username, 20) {
                Ok(lines) => {
                    for line in lines {
                        println!("{}", line);
                    }
                }
                Err(e) => fail(e),
            },
            "exit" => {
                println!("Logged out.");
                return;
            }
            "" => {}
            _ => println!("❌ Unknown command!"),
        }
    }
}

fn print_account_line(username: &str, role: Role, banned: bool) {
    let flag = if banned { " | banned" } else { "" };
    println!("👤 {} | role: {}{}", username, role, flag);
}

fn print_help(manager: &AuthManager, role: Role) {
    println!("📜 Available commands:");
    println!("🔹 whoami — your login and role");
    println!("🔹 changepass — change your password");
    println!("🔹 exit — log out");
    if manager.can_perform(role, Action::ExtendedMode) {
        println!("🔹 setlogin — change your login");
        if role == Role::Vip {
            println!("🔹 giftvip — hand your vip role to another account");
        }
    }
    if manager.can_perform(role, Action::ViewAllAccounts) {
        println!("🔹 showusers — list all accounts");
        println!("🔹 banuser — ban or unban an account");
        println!("🔹 setperm — change an account's role");
        println!("🔹 deluser — delete an account");
        println!("🔹 unlock — reset an account's failed logins");
        println!("🔹 showlog — recent audit entries");
    }
}

fn report(result: Result<(), AuthError>, success: &str) {
    match result {
        Ok(()) => println!("✅ {}", success),
        Err(e) => fail(e),
    }
}

fn fail(e: AuthError) {
    println!("❌ Error: {}", e);
}
