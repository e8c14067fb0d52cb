pub mod common;





#[cfg(test)]
mod test_burn;

#[cfg(test)]
mod test_potion_switch;


#[cfg(test)]
mod test_npc_npc_battle;
